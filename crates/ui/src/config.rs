use motor_panel_protocol::engine::{websocket_url, DEFAULT_PATH};
use motor_panel_protocol::packet::DEFAULT_NAMESPACE;

/// Page wiring and connection settings
///
/// Defaults match the stock panel markup served next to the motor server.
/// Connection settings can be overridden from the page URL:
/// - `?server=` origin of the motor server (`http://rig.local:5000`)
/// - `?path=` Socket.IO mount path
/// - `?namespace=` Socket.IO namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub server: Option<String>,
    pub path: String,
    pub namespace: String,
    pub control_selector: String,
    pub positions_selector: String,
    pub load_label: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            server: None,
            path: DEFAULT_PATH.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            control_selector: ".control".to_string(),
            positions_selector: ".saved-positions ul".to_string(),
            load_label: "Load".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Apply overrides from a `location.search` string
    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();
        let search = search.trim_start_matches('?');

        for pair in search.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match key {
                "server" => config.server = Some(value.to_string()),
                "path" => config.path = value.to_string(),
                "namespace" if value.starts_with('/') => config.namespace = value.to_string(),
                _ => {}
            }
        }

        config
    }

    /// Buttons that send a motor command
    pub fn button_selector(&self) -> String {
        format!("{} button", self.control_selector)
    }

    /// WebSocket endpoint; without a `server` override the page's own origin is used
    pub fn endpoint(&self, page_protocol: &str, page_host: &str) -> String {
        let origin = self.server.as_deref().map_or_else(
            || {
                let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
                format!("{scheme}://{page_host}")
            },
            ws_origin,
        );
        websocket_url(&origin, &self.path)
    }
}

fn ws_origin(server: &str) -> String {
    if let Some(rest) = server.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if server.starts_with("ws://") || server.starts_with("wss://") {
        server.to_string()
    } else {
        format!("ws://{server}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_follows_page_origin() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.endpoint("http:", "127.0.0.1:5000"),
            "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            config.endpoint("https:", "rig.example.com"),
            "wss://rig.example.com/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_query_overrides() {
        let config = BridgeConfig::from_query("?debug=1&server=https://rig.local:5000&namespace=/motors");
        assert_eq!(config.server.as_deref(), Some("https://rig.local:5000"));
        assert_eq!(config.namespace, "/motors");
        assert_eq!(
            config.endpoint("http:", "ignored"),
            "wss://rig.local:5000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_button_selector_follows_control_selector() {
        let mut config = BridgeConfig::default();
        assert_eq!(config.button_selector(), ".control button");
        config.control_selector = "[data-motor-id]".to_string();
        assert_eq!(config.button_selector(), "[data-motor-id] button");
    }

    #[test]
    fn test_bare_host_and_bad_values() {
        let config = BridgeConfig::from_query("server=10.0.0.7:5000&namespace=motors&path=");
        assert_eq!(config.namespace, "/");
        assert_eq!(config.path, "/socket.io/");
        assert_eq!(
            config.endpoint("http:", "ignored"),
            "ws://10.0.0.7:5000/socket.io/?EIO=4&transport=websocket"
        );
    }
}
