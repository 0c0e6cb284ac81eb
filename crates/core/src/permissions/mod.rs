#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    fn matches(&self, str: &str) -> bool {
        let mut segments = str.split('.');
        for segment in &self.path {
            match (segment, segments.next()) {
                (PathSegment::WildCard, _) => return true,
                (PathSegment::Named(name), Some(other)) if name == other => {}
                _ => return false,
            }
        }
        segments.next().is_none()
    }
}

/// Permission nodes of one requester, in the order they were granted.
/// `a.b.*` matches everything below `a.b`; the first matching node wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionsCache {
    nodes: Vec<PermissionNode>,
}

impl PermissionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_node_val(&self, name: &str) -> Option<bool> {
        self.nodes
            .iter()
            .find(|node| node.matches(name))
            .map(|node| node.value)
    }

    pub fn insert(&mut self, name: &str, value: bool) {
        let path = name
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_owned()),
            })
            .collect();
        self.nodes.push(PermissionNode { path, value });
    }

    pub fn grant(mut self, name: &str) -> Self {
        self.insert(name, true);
        self
    }

    pub fn deny(mut self, name: &str) -> Self {
        self.insert(name, false);
        self
    }
}

impl<'a> FromIterator<&'a str> for PermissionsCache {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut cache = PermissionsCache::new();
        for name in iter {
            match name.strip_prefix('-') {
                Some(denied) => cache.insert(denied, false),
                None => cache.insert(name, true),
            }
        }
        cache
    }
}

/// Whoever a command tree is being built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    name: String,
    console: bool,
    permissions: PermissionsCache,
}

impl Requester {
    pub fn player(name: impl Into<String>, permissions: PermissionsCache) -> Self {
        Self {
            name: name.into(),
            console: false,
            permissions,
        }
    }

    /// The server console, which holds every permission.
    pub fn console() -> Self {
        Self {
            name: "Console".to_string(),
            console: true,
            permissions: PermissionsCache::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_console(&self) -> bool {
        self.console
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.console || self.permissions.get_node_val(permission).unwrap_or(false)
    }
}
