use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::GroupAction;
use crate::openmotics_api::types::OpenMoticsError;

/// Group actions (scenes and action sequences) of the selected installation
#[derive(Debug, Clone, Copy)]
pub struct GroupActions<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> GroupActions<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<GroupAction>, OpenMoticsError> {
        self.client.list_resources("/groupactions", filter).await
    }

    pub async fn get_by_id(&self, groupaction_id: i64) -> Result<GroupAction, OpenMoticsError> {
        self.client.get_resource("/groupactions", groupaction_id).await
    }

    /// Run a group action
    pub async fn trigger(&self, groupaction_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/groupactions", groupaction_id, "trigger", None)
            .await
    }

    /// Group actions with the given intended usage
    ///
    /// The usage is matched server-side through the `filter` parameter.
    pub async fn by_usage(&self, usage: &str) -> Result<Vec<GroupAction>, OpenMoticsError> {
        let filter = serde_json::json!({ "usage": usage }).to_string();
        self.get_all(Some(&filter)).await
    }

    /// Group actions meant to be used as a scene, e.g. "watching tv"
    pub async fn scenes(&self) -> Result<Vec<GroupAction>, OpenMoticsError> {
        self.by_usage("SCENE").await
    }
}
