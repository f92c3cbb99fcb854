use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::Sensor;
use crate::openmotics_api::types::OpenMoticsError;

/// Sensors of the selected installation
#[derive(Debug, Clone, Copy)]
pub struct Sensors<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Sensors<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    /// List all sensors, optionally filtered
    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Sensor>, OpenMoticsError> {
        self.client.list_resources("/sensors", filter).await
    }

    /// Get a single sensor by id
    pub async fn get_by_id(&self, sensor_id: i64) -> Result<Sensor, OpenMoticsError> {
        self.client.get_resource("/sensors", sensor_id).await
    }
}
