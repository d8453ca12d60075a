pub mod limits;
pub mod validator;
