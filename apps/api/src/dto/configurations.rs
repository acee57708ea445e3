mod conversions;
mod types;

pub use types::{
    ConfigurationDefaultsResponse, ConfigurationListItemResponse, ConfigurationListParams,
    ConfigurationListResponse, ConfigurationResponse, SaveConfigurationRequest,
};
