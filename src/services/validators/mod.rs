pub mod address;
pub mod dob;
pub mod phone;

pub use address::{validate_address, AddressInput, AddressVerdict};
pub use dob::{validate_date_of_birth, DobVerdict};
pub use phone::{validate_phone, PhoneVerdict};
