//! Connection configuration for the search cluster.

use std::time::Duration;

/// Connection settings for the search cluster.
///
/// Constructed once at startup and handed to the client implementation that
/// assembles the transport. The node list comes from a comma-separated
/// address string; an optional `https://` prefix is stripped before
/// splitting, and the address order is preserved.
///
/// Timeouts apply uniformly to all calls; there is no per-operation timeout.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Username for basic authentication.
    pub username: String,
    /// Password for basic authentication.
    pub password: String,
    /// Node addresses, scheme stripped, in the order given.
    pub nodes: Vec<String>,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for a request once a connection is held.
    pub request_timeout: Duration,
    /// Socket read timeout.
    pub socket_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a configuration from a comma-separated node address string.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        nodes: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
        socket_timeout: Duration,
    ) -> Self {
        let nodes = nodes
            .replace("https://", "")
            .split(',')
            .map(str::to_string)
            .collect();

        Self {
            username: username.into(),
            password: password.into(),
            nodes,
            connect_timeout,
            request_timeout,
            socket_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_nodes(nodes: &str) -> ConnectionConfig {
        ConnectionConfig::new(
            "elastic",
            "changeme",
            nodes,
            Duration::from_secs(5),
            Duration::from_secs(30),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn strips_scheme_and_splits_on_commas() {
        let config = config_with_nodes("https://node1:9200,node2:9200");

        assert_eq!(config.nodes, vec!["node1:9200", "node2:9200"]);
    }

    #[test]
    fn preserves_node_order() {
        let config = config_with_nodes("https://c:9200,https://a:9200,https://b:9200");

        assert_eq!(config.nodes, vec!["c:9200", "a:9200", "b:9200"]);
    }

    #[test]
    fn single_node_without_scheme() {
        let config = config_with_nodes("localhost:9200");

        assert_eq!(config.nodes, vec!["localhost:9200"]);
    }
}
