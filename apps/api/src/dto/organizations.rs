mod conversions;
mod types;

pub use types::{
    OrganizationResponse, SaveOrganizationRequest, SelectOrganizationRequest,
    SelectedOrganizationResponse,
};
