//! DNS helpers
// (c) 2025 Ross Younger

use std::net::SocketAddr;

use anyhow::Context as _;

use super::AddressFamily;

/// Resolves a server endpoint
///
/// Results can be restricted to a given address family.
/// Only the first matching result is returned.
/// If there are no matching records of the required type, returns an error.
pub(crate) async fn resolve_endpoint(
    host: &str,
    port: u16,
    desired: AddressFamily,
) -> anyhow::Result<SocketAddr> {
    let mut candidates = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("host name lookup for {host} failed"))?;

    let found = match desired {
        AddressFamily::Any => candidates.next(),
        AddressFamily::Inet => candidates.find(SocketAddr::is_ipv4),
        AddressFamily::Inet6 => candidates.find(SocketAddr::is_ipv6),
    };
    found.ok_or_else(|| anyhow::anyhow!("host {host} found, but not as {desired}"))
}

#[cfg(test)]
mod tests {
    use super::AddressFamily;
    use super::resolve_endpoint;

    #[tokio::test]
    async fn literal_ipv4() {
        let result = resolve_endpoint("127.0.0.1", 6543, AddressFamily::Inet)
            .await
            .unwrap();
        assert!(result.is_ipv4());
        assert_eq!(result.port(), 6543);
    }

    #[tokio::test]
    async fn literal_ipv6() {
        let result = resolve_endpoint("::1", 1, AddressFamily::Inet6)
            .await
            .unwrap();
        assert!(result.is_ipv6());
    }

    #[tokio::test]
    async fn any_family() {
        let result = resolve_endpoint("127.0.0.1", 1, AddressFamily::Any)
            .await
            .unwrap();
        assert!(result.is_ipv4());
    }

    #[tokio::test]
    async fn wrong_family() {
        let e = resolve_endpoint("127.0.0.1", 1, AddressFamily::Inet6)
            .await
            .unwrap_err();
        assert!(e.to_string().contains("not as inet6"));
    }

    #[tokio::test]
    async fn failure() {
        let result = resolve_endpoint("no.such.host.invalid", 1, AddressFamily::Any).await;
        assert!(result.is_err());
    }
}
