//! OpenMotics SDK
//!
//! An asynchronous Rust client for the OpenMotics cloud API.
//!
//! This SDK provides:
//! - OAuth2 client-credentials token acquisition and refresh
//! - An authenticated HTTP transport with retry/backoff and typed errors
//! - Typed accessors for installations, inputs, outputs, lights, sensors, shutters,
//!   thermostats and group actions
//! - Configuration from code, `OPENMOTICS_*` environment variables or TOML
//!
//! # Example
//!
//! ```no_run
//! use openmotics_sdk::{ClientConfig, OpenMoticsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let mut client = OpenMoticsClient::new(config)?;
//!
//! // Pick the first installation the credentials give access to
//! let installations = client.installations().get_all(None).await?;
//! client.set_installation_id(installations[0].id);
//!
//! // Switch on a dimmer at 60%
//! client.lights().turn_on(18, Some(60)).await?;
//!
//! // Read sensors and trigger a scene
//! for sensor in client.sensors().get_all(None).await? {
//!     println!("{}: {:?}", sensor, sensor.status);
//! }
//! if let Some(scene) = client.groupactions().scenes().await?.first() {
//!     client.groupactions().trigger(scene.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod openmotics_api;

// Re-export commonly used types
pub use openmotics_api::{
    auth::{AccessToken, ClientCredentials, StaticToken, TokenProvider},
    client::{OpenMoticsClient, RetryPolicy},
    config::{ClientConfig, CLOUD_BASE_URL, CLOUD_SCOPE},
    groupactions::GroupActions,
    inputs::Inputs,
    installations::Installations,
    lights::Lights,
    outputs::Outputs,
    resources::{
        Acl, Allowed, FloorCoordinates, GroupAction, Input, InputStatus, Installation,
        InstallationNetwork, Light, Location, Output, OutputStatus, ResourceResponse, Sensor,
        SensorStatus, Shutter, ShutterAttributes, ShutterStatus, ThermostatGroup,
        ThermostatGroupAcl, ThermostatGroupState, ThermostatGroupStatus, ThermostatUnit,
        ThermostatUnitLocation, ThermostatUnitStatus,
    },
    sensors::Sensors,
    shutters::Shutters,
    thermostats::{ThermostatGroups, ThermostatUnits, Thermostats},
    types::{ApiError, OpenMoticsError, TokenResponse},
};
