use crate::openmotics_api::client::OpenMoticsClient;
use crate::openmotics_api::resources::Input;
use crate::openmotics_api::types::OpenMoticsError;

/// Inputs (push buttons, motion detectors, ...) of the selected installation
///
/// Inputs are read-only through the cloud API.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Input>, OpenMoticsError> {
        self.client.list_resources("/inputs", filter).await
    }

    pub async fn get_by_id(&self, input_id: i64) -> Result<Input, OpenMoticsError> {
        self.client.get_resource("/inputs", input_id).await
    }
}
