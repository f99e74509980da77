//! Model config files: `Modules/{Module}/Data/{model_snake}.php`.

use crate::{
    application::ports::{FragmentLoader, Reporter},
    domain::{
        ArtifactKind, ConfigMap, ConfigValue, GeneratedArtifact, ModelRecord, RelativePath,
        build_field_metadata, naming,
        php::{self, CONFIG_INDENT},
    },
    error::ForgeResult,
};

/// Report keys holding a bare model name to qualify.
const REPORT_MODEL_KEYS: [&str; 3] = ["model", "itemsModel", "recordModel"];

pub struct ConfigGenerator<'a> {
    fragments: &'a dyn FragmentLoader,
    reporter: &'a dyn Reporter,
}

impl<'a> ConfigGenerator<'a> {
    pub fn new(fragments: &'a dyn FragmentLoader, reporter: &'a dyn Reporter) -> Self {
        Self {
            fragments,
            reporter,
        }
    }

    pub fn generate(
        &self,
        model_name: &str,
        module: &str,
        model: &ModelRecord,
    ) -> ForgeResult<GeneratedArtifact> {
        let path = RelativePath::module_dir(module)?
            .join("Data")?
            .join(format!("{}.php", naming::snake(model_name)))?;
        let config = self.build(model_name, module, model)?;
        let content = php::render_return(&ConfigValue::Map(config), CONFIG_INDENT);
        Ok(GeneratedArtifact::new(ArtifactKind::Config, path, content))
    }

    /// The config array. Included fragments come first and lose to every
    /// generated key, which keeps the fragment's key position.
    pub fn build(&self, model_name: &str, module: &str, model: &ModelRecord) -> ForgeResult<ConfigMap> {
        let mut config = ConfigMap::new();
        for include in &model.includes {
            match self.fragments.load_fragment(module, include)? {
                Some(fragment) => config.extend(fragment),
                None => self
                    .reporter
                    .warning(model_name, &format!("Included file '{include}' not found")),
            }
        }

        let mut partial_error = None;
        let mut load_partial = |path: &str| -> Option<ConfigMap> {
            match self.fragments.load_fragment(module, path) {
                Ok(found) => found,
                Err(e) => {
                    partial_error.get_or_insert(e);
                    None
                }
            }
        };
        let metadata = build_field_metadata(model_name, module, model, &mut load_partial);
        if let Some(e) = partial_error {
            return Err(e);
        }
        for issue in &metadata.issues {
            self.reporter.warning(model_name, &issue.to_string());
        }

        let or_empty = |value: &Option<ConfigValue>| {
            value
                .clone()
                .unwrap_or_else(|| ConfigValue::List(Vec::new()))
        };
        let relations: ConfigMap = model
            .relations
            .iter()
            .map(|(name, relation)| (name.clone(), relation.to_config()))
            .collect();

        config.insert("model".into(), naming::model_class(module, model_name).into());
        config.insert("fieldDefinitions".into(), ConfigValue::Map(metadata.definitions));
        config.insert("hiddenFields".into(), or_empty(&model.hidden_fields));
        config.insert("simpleActions".into(), or_empty(&model.simple_actions));
        config.insert("isTransaction".into(), model.is_transaction.unwrap_or(false).into());
        config.insert("dispatchEvents".into(), model.dispatch_events.unwrap_or(false).into());
        config.insert("controls".into(), or_empty(&model.controls));
        config.insert("fieldGroups".into(), or_empty(&model.field_groups));
        config.insert("moreActions".into(), or_empty(&model.more_actions));
        config.insert("switchViews".into(), or_empty(&model.switch_views));
        config.insert("relations".into(), ConfigValue::Map(relations));
        config.insert("report".into(), report(module, model.report.as_ref()));
        Ok(config)
    }
}

/// Qualify the report's model references with the module namespace.
fn report(module: &str, report: Option<&ConfigValue>) -> ConfigValue {
    let Some(ConfigValue::Map(report)) = report else {
        return report.cloned().unwrap_or_else(|| ConfigValue::List(Vec::new()));
    };
    let mut report = report.clone();
    for key in REPORT_MODEL_KEYS {
        if let Some(ConfigValue::String(model)) = report.get_mut(key) {
            *model = naming::model_class(module, naming::trim_class(model));
        }
    }
    ConfigValue::Map(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ports::MockReporter,
        test_support::{StaticFragments, quiet_reporter},
    };

    fn model(yaml: &str) -> ModelRecord {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn keys_in_fixed_order_with_defaults() {
        let fragments = StaticFragments::default();
        let reporter = quiet_reporter();
        let config = ConfigGenerator::new(&fragments, &reporter)
            .build("OrderItem", "sales", &model("fields:\n  qty: { type: integer }\n"))
            .unwrap();
        let keys: Vec<_> = config.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "model",
                "fieldDefinitions",
                "hiddenFields",
                "simpleActions",
                "isTransaction",
                "dispatchEvents",
                "controls",
                "fieldGroups",
                "moreActions",
                "switchViews",
                "relations",
                "report"
            ]
        );
        assert_eq!(config["model"], ConfigValue::from("App\\Modules\\Sales\\Models\\OrderItem"));
        assert_eq!(config["isTransaction"], ConfigValue::Bool(false));
        assert_eq!(config["controls"], ConfigValue::List(Vec::new()));
    }

    #[test]
    fn includes_have_lower_priority() {
        let fragments = StaticFragments::default()
            .with("base.yaml", "perPage: 25\ncontrols: [export]\n");
        let reporter = quiet_reporter();
        let config = ConfigGenerator::new(&fragments, &reporter)
            .build("Order", "sales", &model("controls: [print]\nincludes: [base.yaml]\n"))
            .unwrap();
        let keys: Vec<_> = config.keys().map(String::as_str).collect();
        assert_eq!(&keys[..3], ["perPage", "controls", "model"]);
        assert_eq!(config["perPage"], ConfigValue::Int(25));
        assert_eq!(config["controls"], ConfigValue::from(vec!["print"]));
    }

    #[test]
    fn missing_include_and_partial_are_warnings() {
        let fragments = StaticFragments::default();
        let mut reporter = MockReporter::new();
        reporter.expect_warning().times(2).return_const(());
        let config = ConfigGenerator::new(&fragments, &reporter)
            .build(
                "Order",
                "sales",
                &model("includes: [gone.yaml]\nfields:\n  address: { partial: address.yaml }\n"),
            )
            .unwrap();
        assert!(config["fieldDefinitions"].as_map().unwrap().is_empty());
    }

    #[test]
    fn report_models_are_qualified() {
        let fragments = StaticFragments::default();
        let reporter = quiet_reporter();
        let config = ConfigGenerator::new(&fragments, &reporter)
            .build(
                "Invoice",
                "billing",
                &model("report: { model: Invoice, itemsModel: InvoiceItem, title: Invoices }\n"),
            )
            .unwrap();
        let report = &config["report"];
        assert_eq!(report.get("model"), Some(&"App\\Modules\\Billing\\Models\\Invoice".into()));
        assert_eq!(
            report.get("itemsModel"),
            Some(&"App\\Modules\\Billing\\Models\\InvoiceItem".into())
        );
        assert_eq!(report.get("title"), Some(&"Invoices".into()));
    }

    #[test]
    fn renders_as_php_return() {
        let fragments = StaticFragments::default();
        let reporter = quiet_reporter();
        let artifact = ConfigGenerator::new(&fragments, &reporter)
            .generate(
                "OrderItem",
                "sales",
                &model("relations:\n  order: { type: belongsTo, model: Order }\n"),
            )
            .unwrap();
        assert_eq!(artifact.path.to_string(), "Modules/Sales/Data/order_item.php");
        assert!(artifact.content.starts_with("<?php\n\nreturn [\n  'model' => 'App\\\\Modules\\\\Sales\\\\Models\\\\OrderItem',"));
        assert!(artifact.content.contains("  'relations' => [\n    'order' => [\n      'type' => 'belongsTo',"));
        assert!(artifact.content.ends_with("];\n"));
    }
}
