mod conversions;
mod types;

pub use types::{
    CreateUserRequest, UpdateUserRequest, UserListItemResponse, UserListParams, UserListResponse,
    UserResponse,
};
