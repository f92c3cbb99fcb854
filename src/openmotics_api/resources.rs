use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Single resource response wrapper
///
/// The cloud API wraps every payload, lists included, in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse<T> {
    pub data: T,
}

/// Permission flag inside an ACL entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowed {
    #[serde(default)]
    pub allowed: Option<bool>,
}

/// Installation access control list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Acl {
    #[serde(default)]
    pub configure: Option<Allowed>,
    #[serde(default)]
    pub view: Option<Allowed>,
    #[serde(default)]
    pub control: Option<Allowed>,
}

/// Network details of an installation's gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallationNetwork {
    #[serde(default)]
    pub local_ip_address: Option<String>,
}

/// Installation resource (a building managed through the cloud)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gateway_model: Option<String>,
    #[serde(rename = "_acl", default)]
    pub acl: Option<Acl>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
    #[serde(default)]
    pub user_role: Option<serde_json::Value>,
    #[serde(default)]
    pub registration_key: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub building_roles: Option<serde_json::Value>,
    #[serde(default)]
    pub network: Option<InstallationNetwork>,
    #[serde(default)]
    pub flags: Option<serde_json::Value>,
    #[serde(default)]
    pub features: Option<serde_json::Value>,
}

impl fmt::Display for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

/// Position on a floor plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorCoordinates {
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
}

/// Where a device lives inside an installation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub floor_coordinates: Option<FloorCoordinates>,
    #[serde(default)]
    pub installation_id: Option<i64>,
    #[serde(default)]
    pub gateway_id: Option<i64>,
    #[serde(default)]
    pub floor_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
}

/// Output state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub on: bool,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub manual_override: Option<bool>,
    /// Dimmer level 0-100 for dimmable outputs
    #[serde(default)]
    pub value: Option<u8>,
}

/// Output resource (relay, dimmer, outlet, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<OutputStatus>,
    /// Epoch seconds
    #[serde(default)]
    pub last_state_change: Option<f64>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl Output {
    pub fn is_on(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.on)
    }

    /// Whether the output accepts a dimmer value
    pub fn is_dimmable(&self) -> bool {
        self.capabilities.iter().any(|c| c == "RANGE")
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.id,
            self.name.as_deref().unwrap_or_default(),
            self.output_type.as_deref().unwrap_or_default()
        )
    }
}

/// Light resource; the API exposes lights as outputs of type `LIGHT`
pub type Light = Output;

/// Input state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub on: bool,
    #[serde(default)]
    pub last_change: Option<f64>,
}

/// Input resource (push button, motion sensor, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub status: Option<InputStatus>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl Input {
    pub fn is_on(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.on)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

/// Sensor readings; which fields are set depends on the physical quantity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorStatus {
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub brightness: Option<f64>,
}

/// Sensor resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub physical_quantity: Option<String>,
    #[serde(default)]
    pub status: Option<SensorStatus>,
    #[serde(default)]
    pub last_state_change: Option<f64>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

/// Shutter state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShutterStatus {
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub manual_override: Option<bool>,
    /// `UP`, `DOWN`, `STOP`, `GOING_UP` or `GOING_DOWN`
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub last_change: Option<f64>,
    #[serde(default)]
    pub preset_position: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShutterAttributes {
    #[serde(default)]
    pub azimuth: Option<String>,
    #[serde(default)]
    pub compass_point: Option<String>,
    #[serde(default)]
    pub surface_area: Option<String>,
}

/// Shutter resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shutter {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub shutter_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub status: Option<ShutterStatus>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub attributes: Option<ShutterAttributes>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl fmt::Display for Shutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

/// Group action resource (a scene or a sequence of basic actions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAction {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<i64>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Intended usage, e.g. `SCENE`
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl GroupAction {
    pub fn is_scene(&self) -> bool {
        self.usage.as_deref() == Some("SCENE")
    }
}

impl fmt::Display for GroupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermostatGroupStatus {
    /// `HEATING` or `COOLING`
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub state: Option<ThermostatGroupState>,
}

/// On/off state of a thermostat group
///
/// Gateways report either a boolean or the strings `ON`/`OFF`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThermostatGroupState {
    Flag(bool),
    Named(String),
}

impl ThermostatGroupState {
    pub fn is_on(&self) -> bool {
        match self {
            ThermostatGroupState::Flag(on) => *on,
            ThermostatGroupState::Named(state) => state.eq_ignore_ascii_case("ON"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermostatGroupAcl {
    #[serde(default)]
    pub set_state: Option<Allowed>,
    #[serde(default)]
    pub set_mode: Option<Allowed>,
}

/// Thermostat group resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatGroup {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub status: Option<ThermostatGroupStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Vec<String>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
    #[serde(rename = "_acl", default)]
    pub acl: Option<ThermostatGroupAcl>,
    #[serde(default)]
    pub thermostat_ids: Option<serde_json::Value>,
    #[serde(default)]
    pub schedule: Option<serde_json::Value>,
}

impl fmt::Display for ThermostatGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermostatUnitLocation {
    #[serde(default)]
    pub thermostat_group_id: Option<i64>,
    #[serde(default)]
    pub installation_id: Option<i64>,
    #[serde(default)]
    pub room_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermostatUnitStatus {
    #[serde(default)]
    pub actual_temperature: Option<f64>,
    #[serde(default)]
    pub current_setpoint: Option<f64>,
    #[serde(default)]
    pub output_0: Option<f64>,
    #[serde(default)]
    pub output_1: Option<f64>,
    /// `AUTO`, `PARTY`, `AWAY` or `VACATION`
    #[serde(default)]
    pub preset: Option<String>,
}

/// Thermostat unit resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatUnit {
    pub id: i64,
    #[serde(default)]
    pub local_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<ThermostatUnitLocation>,
    #[serde(default)]
    pub status: Option<ThermostatUnitStatus>,
    #[serde(default)]
    pub configuration: Option<serde_json::Value>,
    #[serde(rename = "_version", default)]
    pub version: Option<serde_json::Value>,
}

impl fmt::Display for ThermostatUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.name.as_deref().unwrap_or_default())
    }
}
