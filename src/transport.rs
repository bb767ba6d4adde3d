//! Command transport boundary
//!
//! The core decides *what* to send and in *what shape*; putting it on a
//! wire (HIP lines, HTTP, whatever the installation uses) belongs to the
//! collaborator behind this trait.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::commands::CommandName;

/// External collaborator that carries a shaped command to a renderer.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Invoke `command` against the renderer at `resource` with the given
    /// payload. Payloads are either `{}` (argument-less commands) or the
    /// framed object built by the compiler.
    async fn invoke(&self, resource: &str, command: CommandName, payload: Value) -> Result<()>;
}

/// Transport that only logs, for dry runs and local validation.
#[derive(Debug, Default)]
pub struct DryRunTransport;

#[async_trait]
impl CommandTransport for DryRunTransport {
    async fn invoke(&self, resource: &str, command: CommandName, payload: Value) -> Result<()> {
        tracing::info!("dry-run: {} <- {}: {}", resource, command, payload);
        Ok(())
    }
}
