//! Naming-convention rules for generated gRPC code.
//!
//! protoc-gen-go-grpc names things predictably: `XxxClient` and `XxxServer`
//! interfaces, an `UnimplementedXxxServer` stub struct, an `UnsafeXxxServer`
//! marker interface and a `RegisterXxxServer` function. Every rule lives in
//! `RULES` so the conventions can change without touching traversal code.

use crate::analysis::{Declaration, DeclarationKind};

pub const CLIENT_SUFFIX: &str = "Client";
pub const SERVER_SUFFIX: &str = "Server";
pub const UNSAFE_PREFIX: &str = "Unsafe";
pub const UNIMPLEMENTED_PREFIX: &str = "Unimplemented";
pub const REGISTER_PREFIX: &str = "Register";

/// What a matched declaration is in the RPC surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcRole {
    Client,
    Server,
    UnimplementedServer,
    Registrar,
}

impl RpcRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcRole::Client => "client",
            RpcRole::Server => "server",
            RpcRole::UnimplementedServer => "unimplemented_server",
            RpcRole::Registrar => "registrar",
        }
    }
}

impl std::fmt::Display for RpcRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration shape a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Interface,
    /// Struct or other named non-interface type.
    Concrete,
    Function,
}

impl Shape {
    fn accepts(&self, kind: DeclarationKind) -> bool {
        match self {
            Shape::Interface => kind == DeclarationKind::Interface,
            Shape::Concrete => kind.is_concrete_type(),
            Shape::Function => kind == DeclarationKind::Function,
        }
    }
}

/// One classification rule: shape + `prefix<Base>suffix` name pattern.
#[derive(Debug)]
pub struct NamingRule {
    pub role: RpcRole,
    pub shape: Shape,
    pub prefix: &'static str,
    pub suffix: &'static str,
    /// Names starting with any of these are never matched.
    pub excluded_prefixes: &'static [&'static str],
    /// A function must take a parameter whose type is the name minus `prefix`.
    pub requires_own_param: bool,
    /// The bare affix (`Client`, `Server`) matches on its own.
    pub allows_bare_name: bool,
}

/// Rules in order of increasing specificity.
pub static RULES: &[NamingRule] = &[
    NamingRule {
        role: RpcRole::Client,
        shape: Shape::Interface,
        prefix: "",
        suffix: CLIENT_SUFFIX,
        excluded_prefixes: &[],
        requires_own_param: false,
        allows_bare_name: true,
    },
    NamingRule {
        role: RpcRole::Server,
        shape: Shape::Interface,
        prefix: "",
        suffix: SERVER_SUFFIX,
        excluded_prefixes: &[UNSAFE_PREFIX],
        requires_own_param: false,
        allows_bare_name: true,
    },
    NamingRule {
        role: RpcRole::UnimplementedServer,
        shape: Shape::Concrete,
        prefix: UNIMPLEMENTED_PREFIX,
        suffix: SERVER_SUFFIX,
        excluded_prefixes: &[],
        requires_own_param: false,
        allows_bare_name: false,
    },
    NamingRule {
        role: RpcRole::Registrar,
        shape: Shape::Function,
        prefix: REGISTER_PREFIX,
        suffix: SERVER_SUFFIX,
        excluded_prefixes: &[],
        requires_own_param: true,
        allows_bare_name: false,
    },
];

impl NamingRule {
    /// The `<Base>` part of a name, if the name fits this rule's pattern.
    ///
    /// Empty only for rules that accept the bare affix.
    pub fn base_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        if self.excluded_prefixes.iter().any(|p| name.starts_with(p)) {
            return None;
        }
        let base = name.strip_prefix(self.prefix)?.strip_suffix(self.suffix)?;
        if base.is_empty() && !self.allows_bare_name {
            None
        } else {
            Some(base)
        }
    }

    /// Check a declaration against shape, name pattern and parameter hint.
    pub fn matches(&self, decl: &Declaration) -> bool {
        if !self.shape.accepts(decl.kind) || self.base_name(&decl.name).is_none() {
            return false;
        }
        if self.requires_own_param {
            let target = &decl.name[self.prefix.len()..];
            return decl
                .param_types
                .iter()
                .any(|ty| ty == target || ty.rsplit('.').next() == Some(target));
        }
        true
    }
}

/// Look up the rule for a role.
pub fn rule(role: RpcRole) -> &'static NamingRule {
    match role {
        RpcRole::Client => &RULES[0],
        RpcRole::Server => &RULES[1],
        RpcRole::UnimplementedServer => &RULES[2],
        RpcRole::Registrar => &RULES[3],
    }
}

/// Classify a declaration, first matching rule wins.
pub fn classify(decl: &Declaration) -> Option<RpcRole> {
    RULES.iter().find(|r| r.matches(decl)).map(|r| r.role)
}

/// Service base name of a client or server interface.
///
/// A bare `Client` or `Server` interface names no service.
pub fn service_base(decl: &Declaration) -> Option<&str> {
    match classify(decl)? {
        role @ (RpcRole::Client | RpcRole::Server) => rule(role)
            .base_name(&decl.name)
            .filter(|base| !base.is_empty()),
        _ => None,
    }
}
