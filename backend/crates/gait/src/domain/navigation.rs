//! Dashboard sidebar navigation

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SIDEBAR_ITEMS: [NavItem; 4] = [
    NavItem {
        label: "Overview",
        href: "/dashboard",
    },
    NavItem {
        label: "Activity",
        href: "/dashboard/activity",
    },
    NavItem {
        label: "History",
        href: "/dashboard/history",
    },
    NavItem {
        label: "Settings",
        href: "/dashboard/settings",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Sidebar for `current_path`; only an exact match is active
pub fn sidebar(current_path: &str) -> Vec<SidebarEntry> {
    SIDEBAR_ITEMS
        .iter()
        .map(|item| SidebarEntry {
            label: item.label,
            href: item.href,
            active: item.href == current_path,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(path: &str) -> Vec<&'static str> {
        sidebar(path)
            .into_iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.label)
            .collect()
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(active("/dashboard"), vec!["Overview"]);
        assert_eq!(active("/dashboard/settings"), vec!["Settings"]);
        assert!(active("/dashboard/settings/profile").is_empty());
        assert!(active("/login").is_empty());
    }
}
