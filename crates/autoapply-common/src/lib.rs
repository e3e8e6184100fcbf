pub mod error_mapping;
pub mod protocol;

pub mod error {
    pub mod backend_error;
}
