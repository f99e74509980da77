//! Navigation menu entries.
//!
//! Each module keeps three menu files under `Config/`. Entries are appended
//! to whatever is already there; an entry with the same title and url is
//! never added twice.

use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        ArtifactKind, ConfigMap, ConfigValue, GeneratedArtifact, MenuSection, ModelRecord,
        RelativePath, naming,
        php::{self, MENU_INDENT},
    },
    error::ForgeResult,
};

const DEFAULT_ICON: &str = "fas fa-cube";
const SEPARATOR_ITEM_TYPE: &str = "item-separator";

/// The three menus a model can appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Sidebar,
    TopBar,
    BottomBar,
}

impl MenuKind {
    pub const ALL: [MenuKind; 3] = [Self::Sidebar, Self::TopBar, Self::BottomBar];

    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar_menu.php",
            Self::TopBar => "top_bar_menu.php",
            Self::BottomBar => "bottom_bar_menu.php",
        }
    }

    fn section<'m>(&self, model: &'m ModelRecord) -> Option<&'m MenuSection> {
        match self {
            Self::Sidebar => model.sidebar.as_ref(),
            Self::TopBar => model.top_nav.as_ref(),
            Self::BottomBar => model.bottom_bar.as_ref(),
        }
    }

    /// Sidebar and bottom bar are opt-out; the top bar is opt-in.
    fn is_enabled(&self, section: Option<&MenuSection>) -> bool {
        let add = section.and_then(|s| s.add);
        match self {
            Self::TopBar => add == Some(true),
            Self::Sidebar | Self::BottomBar => add != Some(false),
        }
    }
}

/// What happened to one menu for one model.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuOutcome {
    /// The menu file with the new entry appended.
    Updated(GeneratedArtifact),
    AlreadyPresent(RelativePath),
    Disabled,
}

pub struct MenuGenerator<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> MenuGenerator<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    pub fn generate(
        &self,
        menu: MenuKind,
        model_name: &str,
        module: &str,
        model: &ModelRecord,
    ) -> ForgeResult<MenuOutcome> {
        let section = menu.section(model);
        if !menu.is_enabled(section) {
            return Ok(MenuOutcome::Disabled);
        }
        let default_section = MenuSection::default();
        let section = section.unwrap_or(&default_section);

        let path = RelativePath::module_dir(module)?
            .join("Config")?
            .join(menu.file_name())?;
        let mut entries = self.existing_entries(&path)?;
        let entry = build_entry(menu, model_name, module, model, section);

        if entries.iter().any(|existing| same_entry(existing, &entry)) {
            debug!(model = model_name, menu = menu.file_name(), "Menu entry already present");
            return Ok(MenuOutcome::AlreadyPresent(path));
        }

        if menu == MenuKind::Sidebar {
            if let Some(group) = &section.group_title {
                if !has_group_separator(&entries, group) {
                    entries.push(group_separator(group));
                }
            }
        }
        entries.push(entry);

        let content = php::render_return(&ConfigValue::List(entries), MENU_INDENT);
        Ok(MenuOutcome::Updated(
            GeneratedArtifact::new(ArtifactKind::Menu, path, content).overwriting(true),
        ))
    }

    /// Entries of an existing menu file, empty when there is none.
    fn existing_entries(&self, path: &RelativePath) -> ForgeResult<Vec<ConfigValue>> {
        if !self.filesystem.exists(path.as_path()) {
            return Ok(Vec::new());
        }
        let source = self.filesystem.read_file(path.as_path())?;
        let malformed = |reason: String| ApplicationError::MalformedMenu {
            path: path.clone().into_path_buf(),
            reason,
        };
        match php::parse_return(&source).map_err(|e| malformed(e.to_string()))? {
            ConfigValue::List(items) => Ok(items),
            ConfigValue::Map(map) if map.is_empty() => Ok(Vec::new()),
            ConfigValue::Map(map) => Ok(map.into_values().collect()),
            _ => Err(malformed("expected an array of entries".into()).into()),
        }
    }
}

/// `Order` in module `sales` → `{title: Orders, icon, url: sales/orders, permission: view_order}`.
pub fn build_entry(
    menu: MenuKind,
    model_name: &str,
    module: &str,
    model: &ModelRecord,
    section: &MenuSection,
) -> ConfigValue {
    let plural = naming::plural(model_name);
    let snake = naming::snake(model_name);

    let title = section
        .title
        .clone()
        .unwrap_or_else(|| naming::title(&naming::snake(&plural).replace('_', " ")));
    let icon = section
        .icon_classes
        .as_deref()
        .or(model.icon_classes.as_deref())
        .unwrap_or(DEFAULT_ICON);
    let url = section
        .url
        .clone()
        .unwrap_or_else(|| naming::kebab(&plural));

    let mut entry = ConfigMap::new();
    entry.insert("title".into(), title.into());
    entry.insert("icon".into(), icon.into());
    entry.insert("url".into(), format!("{module}/{url}").into());
    entry.insert(
        "permission".into(),
        section
            .permission
            .clone()
            .unwrap_or_else(|| format!("view_{snake}"))
            .into(),
    );
    if menu == MenuKind::BottomBar {
        entry.insert("key".into(), section.key.clone().unwrap_or(snake).into());
    }
    if let Some(group) = &section.group_title {
        entry.insert("groupTitle".into(), group.as_str().into());
    }
    if let Some(item_type) = &section.item_type {
        entry.insert("itemType".into(), item_type.as_str().into());
    }
    if !section.submenu.is_empty() {
        let submenu = section
            .submenu
            .iter()
            .map(|item| {
                let mut sub = ConfigMap::new();
                sub.insert(
                    "title".into(),
                    item.title.as_deref().unwrap_or("Subitem").into(),
                );
                let url = item.url.as_deref().unwrap_or("").trim_start_matches('/');
                sub.insert("url".into(), format!("{module}/{url}").into());
                if let Some(permission) = &item.permission {
                    sub.insert("permission".into(), permission.as_str().into());
                }
                if let Some(icon) = &item.icon {
                    sub.insert("icon".into(), icon.as_str().into());
                }
                ConfigValue::Map(sub)
            })
            .collect();
        entry.insert("submenu".into(), ConfigValue::List(submenu));
    }
    ConfigValue::Map(entry)
}

fn same_entry(a: &ConfigValue, b: &ConfigValue) -> bool {
    a.get("title") == b.get("title") && a.get("url") == b.get("url")
}

fn group_separator(group: &str) -> ConfigValue {
    let mut separator = ConfigMap::new();
    separator.insert("itemType".into(), SEPARATOR_ITEM_TYPE.into());
    separator.insert(
        "title".into(),
        format!(
            "<h6 class=\"ps-3 mt-4 mb-2 text-uppercase text-xs font-weight-bolder opacity-6 group-title\">{group}</h6>"
        )
        .into(),
    );
    separator.insert("url".into(), ConfigValue::Null);
    ConfigValue::Map(separator)
}

fn has_group_separator(entries: &[ConfigValue], group: &str) -> bool {
    entries.iter().any(|entry| {
        entry.get("itemType").and_then(ConfigValue::as_str) == Some(SEPARATOR_ITEM_TYPE)
            && entry
                .get("title")
                .and_then(ConfigValue::as_str)
                .is_some_and(|title| title.contains(group))
    })
}
