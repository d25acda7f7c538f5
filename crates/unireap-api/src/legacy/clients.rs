// Known-client endpoints
//
// Listing via stat/alluser (every client ever seen) and the bulk
// forget-sta command via cmd/stamgr.

use serde::de::IgnoredAny;
use tracing::debug;

use crate::error::Error;
use crate::legacy::models::{ClientRecord, StamgrCommand};
use crate::legacy::session::ControllerSession;

const CSRF_HEADER: &str = "X-CSRF-Token";

impl ControllerSession {
    /// List every client the controller knows about.
    ///
    /// `GET {apiBase}/api/s/{site}/stat/alluser`
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, Error> {
        self.csrf_token("list clients")?;

        let url = self.site_url("stat/alluser")?;
        debug!(site = %self.site(), "listing known clients");

        let request = self.http.get(url).build()?;
        self.execute(request, None).await?.into_data("alluser")
    }

    /// Forget a batch of clients by MAC address.
    ///
    /// `POST {apiBase}/api/s/{site}/cmd/stamgr` with
    /// `{"cmd": "forget-sta", "macs": [...]}`. The CSRF token captured at
    /// login is sent unchanged on every call.
    pub async fn forget_batch(&self, macs: &[String]) -> Result<(), Error> {
        let csrf_token = self.csrf_token("forget clients")?;
        if macs.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let url = self.site_url("cmd/stamgr")?;
        debug!(site = %self.site(), count = macs.len(), "forgetting clients");

        let request = self
            .http
            .post(url)
            .header(CSRF_HEADER, csrf_token)
            .json(&StamgrCommand::forget(macs))
            .build()?;

        let _: Vec<IgnoredAny> = self.execute(request, None).await?.into_data("stamgr")?;
        Ok(())
    }
}
