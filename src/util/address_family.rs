//! CLI helper - Address family
// (c) 2025 Ross Younger

/// Representation of an IP address family
///
/// This is a local type with special parsing semantics and aliasing to take part in the config/CLI system.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")] // to match clap::ValueEnum
#[strum(serialize_all = "kebab-case")]
pub enum AddressFamily {
    /// IPv4
    /// (aliases: `4`, `inet4`)
    #[default]
    #[value(alias("4"), alias("inet4"))]
    #[serde(alias = "4", alias = "inet4")]
    Inet,
    /// IPv6
    /// (aliases: `6`)
    #[value(alias("6"))]
    #[serde(alias = "6")]
    Inet6,
    /// Unspecified. We use the first address the resolver offers.
    Any,
}
