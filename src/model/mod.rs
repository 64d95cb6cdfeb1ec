pub mod attendance;
pub mod car;
pub mod company_location;
pub mod employee;
pub mod leave_request;
pub mod leave_type;
pub mod makeup_request;
pub mod request;
pub mod role;
