//! gRPC surface matchers.

use std::collections::HashSet;

use super::naming::{self, RpcRole};
use super::Definition;
use crate::analysis::FileFacts;

/// Selects definitions from one parsed file.
pub trait Matcher: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Definitions found in a single file, in declaration order.
    fn collect(&self, facts: &FileFacts) -> Vec<Definition>;

    /// Post-process the concatenated results of a whole scan.
    fn finish(&self, definitions: Vec<Definition>) -> Vec<Definition> {
        definitions
    }
}

/// Matches declarations classified with one `RpcRole`.
#[derive(Debug, Clone, Copy)]
pub struct RoleMatcher {
    role: RpcRole,
}

impl RoleMatcher {
    pub fn new(role: RpcRole) -> Self {
        Self { role }
    }

    /// `XxxClient` interfaces.
    pub fn clients() -> Self {
        Self::new(RpcRole::Client)
    }

    /// `XxxServer` interfaces, `UnsafeXxxServer` excluded.
    pub fn servers() -> Self {
        Self::new(RpcRole::Server)
    }

    /// `UnimplementedXxxServer` stub types.
    pub fn unimplemented_servers() -> Self {
        Self::new(RpcRole::UnimplementedServer)
    }

    /// `RegisterXxxServer` functions.
    pub fn registrars() -> Self {
        Self::new(RpcRole::Registrar)
    }

    pub fn role(&self) -> RpcRole {
        self.role
    }
}

impl Matcher for RoleMatcher {
    fn name(&self) -> &'static str {
        self.role.as_str()
    }

    fn collect(&self, facts: &FileFacts) -> Vec<Definition> {
        let rule = naming::rule(self.role);
        facts
            .declarations
            .iter()
            .filter(|d| rule.matches(d))
            .map(|d| Definition::from_declaration(facts, d))
            .collect()
    }
}

/// Service base names derived from client and server interfaces.
///
/// `GreeterClient` and `GreeterServer` both yield `Greeter`. Each distinct
/// name is reported once per scan, located at its first interface in
/// traversal order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceMatcher;

impl Matcher for ServiceMatcher {
    fn name(&self) -> &'static str {
        "service"
    }

    fn collect(&self, facts: &FileFacts) -> Vec<Definition> {
        let mut seen = HashSet::new();
        let mut services = Vec::new();
        for decl in &facts.declarations {
            if let Some(base) = naming::service_base(decl) {
                if seen.insert(base.to_string()) {
                    services.push(Definition::named(base.to_string(), facts, decl));
                }
            }
        }
        services
    }

    fn finish(&self, definitions: Vec<Definition>) -> Vec<Definition> {
        let mut seen = HashSet::new();
        definitions
            .into_iter()
            .filter(|d| seen.insert(d.name.clone()))
            .collect()
    }
}
