use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::Shutter;
use crate::openmotics_api::types::OpenMoticsError;
use serde_json::json;

/// Fully closed
pub const MAX_POSITION: u8 = 100;

/// Shutters of the selected installation
#[derive(Debug, Clone, Copy)]
pub struct Shutters<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Shutters<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Shutter>, OpenMoticsError> {
        self.client.list_resources("/shutters", filter).await
    }

    pub async fn get_by_id(&self, shutter_id: i64) -> Result<Shutter, OpenMoticsError> {
        self.client.get_resource("/shutters", shutter_id).await
    }

    pub async fn up(&self, shutter_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/shutters", shutter_id, "up", None)
            .await
    }

    pub async fn down(&self, shutter_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/shutters", shutter_id, "down", None)
            .await
    }

    pub async fn stop(&self, shutter_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/shutters", shutter_id, "stop", None)
            .await
    }

    /// Move a shutter to an absolute position (0 = fully up, 100 = fully down)
    ///
    /// Positions above 100 are sent as 100.
    pub async fn change_position(
        &self,
        shutter_id: i64,
        position: u8,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        if position > MAX_POSITION {
            tracing::debug!("Clamping shutter position {} to {}", position, MAX_POSITION);
        }

        let body = json!({ "position": position.min(MAX_POSITION) });
        self.client
            .resource_action("/shutters", shutter_id, "change_position", Some(&body))
            .await
    }

    pub async fn lock(&self, shutter_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/shutters", shutter_id, "lock", None)
            .await
    }

    pub async fn unlock(&self, shutter_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/shutters", shutter_id, "unlock", None)
            .await
    }
}
