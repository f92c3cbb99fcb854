use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::outputs::turn_on;
use crate::openmotics_api::resources::Light;
use crate::openmotics_api::types::OpenMoticsError;

/// Lights of the selected installation
///
/// Lights are outputs of type `LIGHT`, exposed by the API under their own
/// collection.
#[derive(Debug, Clone, Copy)]
pub struct Lights<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Lights<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Light>, OpenMoticsError> {
        self.client.list_resources("/lights", filter).await
    }

    pub async fn get_by_id(&self, light_id: i64) -> Result<Light, OpenMoticsError> {
        self.client.get_resource("/lights", light_id).await
    }

    /// Turn a light on, optionally at a brightness between 0 and 100
    ///
    /// Brightness above 100 is sent as 100.
    pub async fn turn_on(
        &self,
        light_id: i64,
        brightness: Option<u8>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        turn_on(self.client, "/lights", light_id, brightness).await
    }

    pub async fn turn_off(&self, light_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/lights", light_id, "turn_off", None)
            .await
    }

    pub async fn toggle(&self, light_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/lights", light_id, "toggle", None)
            .await
    }
}
