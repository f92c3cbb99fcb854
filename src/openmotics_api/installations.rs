use crate::openmotics_api::client::{filter_query, OpenMoticsClient};
use crate::openmotics_api::resources::{Installation, ResourceResponse};
use crate::openmotics_api::types::OpenMoticsError;

/// Installations visible to the authenticated client
///
/// Unlike the other accessors these calls are not scoped to the selected
/// installation; use them to discover the id to pass to
/// [`OpenMoticsClient::set_installation_id`].
#[derive(Debug, Clone, Copy)]
pub struct Installations<'a> {
    client: &'a OpenMoticsClient,
}

impl<'a> Installations<'a> {
    pub(crate) fn new(client: &'a OpenMoticsClient) -> Self {
        Self { client }
    }

    /// List all installations
    ///
    /// # Arguments
    ///
    /// * `filter` - Optional JSON filter passed through to the API
    ///
    /// # Example
    ///
    /// ```no_run
    /// use openmotics_sdk::OpenMoticsClient;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = OpenMoticsClient::with_client_credentials("id", "secret")?;
    /// for installation in client.installations().get_all(None).await? {
    ///     println!("{}", installation);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_all(&self, filter: Option<&str>) -> Result<Vec<Installation>, OpenMoticsError> {
        tracing::debug!("Listing installations");

        let response: ResourceResponse<Vec<Installation>> = self
            .client
            .get("/base/installations", &filter_query(filter))
            .await?;
        Ok(response.data)
    }

    /// Get a single installation by id
    pub async fn get_by_id(&self, installation_id: i64) -> Result<Installation, OpenMoticsError> {
        let path = format!("/base/installations/{}", installation_id);
        tracing::debug!("Getting installation {}", installation_id);

        let response: ResourceResponse<Installation> = self.client.get(&path, &[]).await?;
        Ok(response.data)
    }
}
