pub mod api;

use crate::cli::Args;
use crate::proxy::ChatProxy;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    proxy: Arc<ChatProxy>,
    args: Args,
}

impl Server {
    pub fn new(
        addr: String,
        proxy: Arc<ChatProxy>,
        args: Args,
    ) -> Self {
        Self {
            addr,
            proxy,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(
            &self.addr,
            self.proxy.clone(),
            &self.args,
        ).await
    }
}
