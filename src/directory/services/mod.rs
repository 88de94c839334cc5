//! Application services for the directory context.

mod registry;

pub use registry::{
    DirectoryService, DirectoryServiceError, DirectoryServiceResult, EditAccountRequest,
    RegisterAccountRequest,
};
