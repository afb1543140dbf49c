//! Web server command.

use console::style;

use crate::config::Settings;

/// Default port when the bind address names only a host.
const DEFAULT_PORT: u16 = 5050;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    println!(
        "{} Starting docsorter API at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!(
        "  {} store in {}",
        settings.store.as_str(),
        settings.data_dir.display()
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "5050" -> 127.0.0.1:5050
/// - Just a host: "0.0.0.0" -> 0.0.0.0:5050
/// - Host and port: "0.0.0.0:5050" -> 0.0.0.0:5050
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("8080").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0").unwrap(),
            ("0.0.0.0".to_string(), DEFAULT_PORT)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:9000").unwrap(),
            ("0.0.0.0".to_string(), 9000)
        );
        assert!(parse_bind_address("").is_err());
    }
}
