//! userdb serve - Run the HTTP server

use clap::Args;

use crate::app::AppContext;
use crate::error::Result;
use crate::http::HttpServer;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides server.port)
    #[arg(long, short)]
    pub port: Option<u16>,
}

pub fn run(ctx: &AppContext, args: &ServeArgs) -> Result<()> {
    let mut server_config = ctx.config.server.clone();
    if let Some(host) = &args.host {
        server_config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let server = HttpServer::new(ctx.store.clone(), server_config);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.start())
}
