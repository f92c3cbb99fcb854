use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::{ThermostatGroup, ThermostatUnit};
use crate::openmotics_api::types::OpenMoticsError;
use serde_json::json;

const GROUPS: &str = "/thermostats/groups";
const UNITS: &str = "/thermostats/units";

/// Thermostats of the selected installation
///
/// The API splits thermostats into groups, which carry the heating/cooling
/// mode, and units, which carry setpoints and presets.
#[derive(Debug, Clone, Copy)]
pub struct Thermostats<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Thermostats<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    pub fn groups(&self) -> ThermostatGroups<'a> {
        ThermostatGroups {
            client: self.client,
        }
    }

    pub fn units(&self) -> ThermostatUnits<'a> {
        ThermostatUnits {
            client: self.client,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThermostatGroups<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> ThermostatGroups<'a> {
    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<ThermostatGroup>, OpenMoticsError> {
        self.client.list_resources(GROUPS, filter).await
    }

    pub async fn get_by_id(&self, group_id: i64) -> Result<ThermostatGroup, OpenMoticsError> {
        self.client.get_resource(GROUPS, group_id).await
    }

    /// Switch a group between `HEATING` and `COOLING`
    pub async fn set_mode(
        &self,
        group_id: i64,
        mode: &str,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        let body = json!({ "mode": mode.to_uppercase() });
        self.client
            .resource_action(GROUPS, group_id, "mode", Some(&body))
            .await
    }

    /// Turn a group `ON` or `OFF`
    pub async fn set_state(
        &self,
        group_id: i64,
        state: &str,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        let body = json!({ "state": state.to_uppercase() });
        self.client
            .resource_action(GROUPS, group_id, "state", Some(&body))
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThermostatUnits<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> ThermostatUnits<'a> {
    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<ThermostatUnit>, OpenMoticsError> {
        self.client.list_resources(UNITS, filter).await
    }

    pub async fn get_by_id(&self, unit_id: i64) -> Result<ThermostatUnit, OpenMoticsError> {
        self.client.get_resource(UNITS, unit_id).await
    }

    /// Change the setpoint of a unit, in degrees Celsius
    pub async fn set_temperature(
        &self,
        unit_id: i64,
        temperature: f64,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        if !temperature.is_finite() {
            return Err(OpenMoticsError::InvalidArgument(format!(
                "temperature must be a finite number, got {}",
                temperature
            )));
        }

        let body = json!({ "temperature": temperature });
        self.client
            .resource_action(UNITS, unit_id, "setpoint", Some(&body))
            .await
    }

    /// Select a preset: `AUTO`, `AWAY`, `PARTY` or `VACATION`
    pub async fn set_preset(
        &self,
        unit_id: i64,
        preset: &str,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        let body = json!({ "preset": preset.to_uppercase() });
        self.client
            .resource_action(UNITS, unit_id, "preset", Some(&body))
            .await
    }
}
