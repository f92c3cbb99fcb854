use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::Output;
use crate::openmotics_api::types::OpenMoticsError;
use serde_json::json;

/// Highest dimmer value the API accepts
pub const MAX_DIMMER_VALUE: u8 = 100;

/// Outputs of the selected installation
///
/// All operations require an installation to be selected on the client.
#[derive(Debug, Clone, Copy)]
pub struct Outputs<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Outputs<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    /// List all outputs, optionally filtered
    ///
    /// # Arguments
    ///
    /// * `filter` - Optional JSON filter, e.g. `{"type":"OUTLET"}`
    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Output>, OpenMoticsError> {
        self.client.list_resources("/outputs", filter).await
    }

    /// Get a single output by id
    pub async fn get_by_id(&self, output_id: i64) -> Result<Output, OpenMoticsError> {
        self.client.get_resource("/outputs", output_id).await
    }

    /// Turn an output on
    ///
    /// # Arguments
    ///
    /// * `output_id` - The output to switch
    /// * `value` - Optional dimmer value; anything above 100 is sent as 100
    ///
    /// # Example
    ///
    /// ```no_run
    /// use openmotics_sdk::OpenMoticsClient;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut client = OpenMoticsClient::with_token("token")?;
    /// client.set_installation_id(21);
    /// client.outputs().turn_on(18, Some(60)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn turn_on(
        &self,
        output_id: i64,
        value: Option<u8>,
    ) -> Result<serde_json::Value, OpenMoticsError> {
        turn_on(self.client, "/outputs", output_id, value).await
    }

    /// Turn an output off
    pub async fn turn_off(&self, output_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/outputs", output_id, "turn_off", None)
            .await
    }

    /// Toggle an output
    pub async fn toggle(&self, output_id: i64) -> Result<serde_json::Value, OpenMoticsError> {
        self.client
            .resource_action("/outputs", output_id, "toggle", None)
            .await
    }
}

/// `turn_on` with an optional dimmer value, shared with lights
pub(crate) async fn turn_on(
    client: &OpenMoticsClient,
    collection: &str,
    id: i64,
    value: Option<u8>,
) -> Result<serde_json::Value, OpenMoticsError> {
    let body = value.map(|v| {
        if v > MAX_DIMMER_VALUE {
            tracing::debug!("Clamping dimmer value {} to {}", v, MAX_DIMMER_VALUE);
        }
        json!({ "value": v.min(MAX_DIMMER_VALUE) })
    });
    client
        .resource_action(collection, id, "turn_on", body.as_ref())
        .await
}
