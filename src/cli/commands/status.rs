//! Status command implementation
//!
//! This module implements the `status` command for checking document store
//! connectivity and listing its collections.

use crate::adapters::database::create_document_store;
use crate::config::load_config_or_default;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Create the store schema if it is missing
    #[arg(long)]
    pub ensure_schema: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking document store status");

        println!("📊 Document Store Status");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let store = create_document_store(&config);

        if let Err(e) = store.test_connection().await {
            println!("❌ Failed to connect to database");
            println!("   Error: {e}");
            return Ok(4); // Connection error exit code
        }
        println!("✅ Connected to {}", store.database_name());

        if self.ensure_schema {
            if let Err(e) = store.ensure_schema().await {
                println!("❌ Failed to create schema");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Schema is in place");
        }

        let collections = match store.list_collections().await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to list collections");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if collections.is_empty() {
            println!("No records stored yet.");
            return Ok(0);
        }

        println!("Found {} collection(s):", collections.len());
        for collection in collections {
            println!("  - {collection}");
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_memory_store_is_reachable() {
        let file = config_file("database_target = \"memory\"\n");
        let args = StatusArgs {
            ensure_schema: true,
        };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_unconfigured_store_is_connection_error() {
        let file = config_file("database_target = \"postgresql\"\n");
        let args = StatusArgs {
            ensure_schema: false,
        };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 4);
    }
}
