pub mod synthetic_eye;
