//! MCP server implementation using pmcp.
//!
//! Tools from a [`ToolRegistry`] are served over stdio or streamable HTTP.

use crate::config::{McpSettings, Transport};
use crate::mcp::tools::ToolRegistry;
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, RequestHandlerExtra, Server,
    ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// An MCP server exposing a tool registry
#[derive(Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
    settings: McpSettings,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl McpServer {
    /// Create a new MCP server for the given tools
    pub fn new(tools: ToolRegistry, settings: McpSettings) -> Result<Self, Error> {
        let server = Self::build_server(&tools, &settings)?;
        Ok(Self {
            server: Arc::new(Mutex::new(server)),
            settings,
        })
    }

    pub fn settings(&self) -> &McpSettings {
        &self.settings
    }

    fn build_server(tools: &ToolRegistry, settings: &McpSettings) -> Result<Server, Error> {
        let mut builder = Server::builder()
            .name(settings.name.as_str())
            .version(settings.version.as_str())
            .capabilities(ServerCapabilities::default());

        for tool in tools.all() {
            let wrapper = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(wrapper.name.clone(), wrapper);
        }

        builder.build()
    }

    /// Serve on the configured transport until shutdown
    pub async fn serve(self) -> Result<(), Error> {
        match self.settings.transport {
            Transport::Stdio => self.run().await,
            Transport::Http | Transport::Sse => {
                let (addr, handle) = self.run_http().await?;
                tracing::info!(%addr, "MCP server listening");
                handle
                    .await
                    .map_err(|e| Error::internal(&format!("HTTP server task failed: {}", e)))
            }
        }
    }

    /// Run the server in stdio mode
    pub async fn run(self) -> Result<(), Error> {
        tracing::info!(name = %self.settings.name, "Starting MCP server in stdio mode");

        // run_stdio() takes ownership of the Server
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("Cannot unwrap Arc - multiple references exist"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Start the streamable HTTP transport on the configured host and port
    pub async fn run_http(&self) -> Result<(SocketAddr, JoinHandle<()>), Error> {
        let addr = self.socket_addr()?;
        tracing::info!(
            name = %self.settings.name,
            transport = ?self.settings.transport,
            %addr,
            "Starting MCP server in HTTP mode"
        );

        StreamableHttpServer::new(addr, self.server.clone()).start().await
    }

    fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let host_port = format!("{}:{}", self.settings.host, self.settings.port);
        host_port
            .to_socket_addrs()
            .map_err(|e| Error::invalid_params(format!("Invalid address {}: {}", host_port, e)))?
            .next()
            .ok_or_else(|| Error::invalid_params(format!("Address {} did not resolve", host_port)))
    }
}

/// Adapts our [`crate::mcp::ToolHandler`] to pmcp's `ToolHandler`
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        tracing::debug!(tool = %self.name, "Tool called");
        self.handler
            .execute(args)
            .await
            .map_err(|e| Error::internal(&e))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
