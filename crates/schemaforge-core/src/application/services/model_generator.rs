//! Model class generation.

use indexmap::IndexSet;

use crate::{
    application::ports::{Reporter, StubStore},
    domain::{
        ArtifactKind, ConfigMap, ConfigValue, GeneratedArtifact, ModelRecord, RelativePath,
        StubContext, StubKind, build_relation_accessor,
        naming::{self, quote},
        type_resolver::resolve_cast_type,
    },
    error::ForgeResult,
};

/// Separator between entries of an array literal inside the class body.
const MEMBER_SEPARATOR: &str = "\n        ";

pub struct ModelGenerator<'a> {
    stubs: &'a dyn StubStore,
    reporter: &'a dyn Reporter,
}

impl<'a> ModelGenerator<'a> {
    pub fn new(stubs: &'a dyn StubStore, reporter: &'a dyn Reporter) -> Self {
        Self { stubs, reporter }
    }

    /// Render `Modules/{Module}/Models/{Model}.php`.
    pub fn generate(
        &self,
        model_name: &str,
        module: &str,
        model: &ModelRecord,
    ) -> ForgeResult<GeneratedArtifact> {
        let stub = self.stubs.load(StubKind::Model, module, model_name)?;
        let path = RelativePath::module_dir(module)?
            .join("Models")?
            .join(format!("{model_name}.php"))?;

        let content = self.context(model_name, module, model).render(&stub);
        Ok(GeneratedArtifact::new(ArtifactKind::Model, path, content))
    }

    fn context(&self, model_name: &str, module: &str, model: &ModelRecord) -> StubContext {
        let owning_class = naming::model_class(module, model_name);
        let mut imports: IndexSet<String> = model
            .imports
            .iter()
            .map(|import| format!("use {};", naming::trim_class(import)))
            .collect();
        let mut relations = Vec::new();

        for (relation_name, relation) in &model.relations {
            match build_relation_accessor(relation_name, relation, model_name, module) {
                Ok(shape) => {
                    imports.extend(shape.imports(&owning_class));
                    relations.push(shape.render_method());
                }
                Err(e) => self.reporter.warning(model_name, &e.to_string()),
            }
        }

        StubContext::new()
            .with("namespace", naming::model_namespace(module))
            .with("module", module)
            .with("modelName", model_name)
            .with("tableName", format!("protected $table = {};", quote(&model.table_name(model_name))))
            .with("fillable", fillable(model))
            .with("guarded", quoted_list(model.guarded.iter().map(String::as_str)))
            .with("casts", casts(model))
            .with("events", raw_pairs(model.events.as_ref()))
            .with("rules", quoted_pairs(model.rules.as_ref()))
            .with("messages", quoted_pairs(model.messages.as_ref()))
            .with("bootMethods", model.boot_methods.join(MEMBER_SEPARATOR))
            .with("relations", relations.join("\n\n"))
            .with("imports", imports.into_iter().collect::<Vec<_>>().join("\n"))
            .with("traitImports", trait_imports(model))
            .with("traitUses", trait_uses(model))
            .with("softDeletes", if model.soft_deletes { "use SoftDeletes;" } else { "" })
            .with("displayFields", display_fields(model))
            .with("primaryKey", protected_string("primaryKey", model.primary_key.as_deref()))
            .with("incrementing", public_bool("incrementing", model.incrementing))
            .with("keyType", protected_string("keyType", model.key_type.as_deref()))
            .with("timestamps", public_bool("timestamps", model.timestamps))
            .with("dateFormat", protected_string("dateFormat", model.date_format.as_deref()))
    }
}

/// Every fillable, unguarded field, then the explicit `fillable` list.
fn fillable(model: &ModelRecord) -> String {
    let from_fields = model
        .fields
        .iter()
        .filter(|(name, field)| field.partial.is_none() && field.is_fillable() && !model.guarded.contains(name))
        .map(|(name, _)| name.as_str());
    quoted_list(from_fields.chain(model.fillable.iter().map(String::as_str)))
}

fn quoted_list<'s>(items: impl Iterator<Item = &'s str>) -> String {
    let unique: IndexSet<String> = items.map(quote).collect();
    unique.into_iter().collect::<Vec<_>>().join(", ")
}

fn casts(model: &ModelRecord) -> String {
    model
        .fields
        .iter()
        .filter_map(|(name, field)| {
            let precision = field
                .modifiers
                .precision
                .as_ref()
                .and_then(ConfigValue::to_plain_string);
            resolve_cast_type(field.logical_type(), precision.as_deref())
                .map(|cast| format!("{} => {}", quote(name), quote(&cast)))
        })
        .collect::<Vec<_>>()
        .join(&format!(",{MEMBER_SEPARATOR}"))
}

/// `'created' => OrderCreated::class,` with the value left as PHP source.
fn raw_pairs(map: Option<&ConfigMap>) -> String {
    pairs(map, |v| v)
}

fn quoted_pairs(map: Option<&ConfigMap>) -> String {
    pairs(map, |v| quote(&v))
}

fn pairs(map: Option<&ConfigMap>, value: impl Fn(String) -> String) -> String {
    map.into_iter()
        .flatten()
        .filter_map(|(key, v)| {
            let text = v.to_plain_string()?;
            Some(format!("{} => {},", quote(key), value(text)))
        })
        .collect::<Vec<_>>()
        .join(MEMBER_SEPARATOR)
}

fn trait_imports(model: &ModelRecord) -> String {
    model
        .traits
        .iter()
        .map(|t| format!("use {};", naming::trim_class(t)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn trait_uses(model: &ModelRecord) -> String {
    if model.traits.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = model.traits.iter().map(|t| naming::class_basename(t)).collect();
    format!("use {};", names.join(", "))
}

fn display_fields(model: &ModelRecord) -> String {
    match &model.display_fields {
        Some(fields) => format!(
            "protected $displayFields = [{}];",
            fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(", ")
        ),
        None => String::new(),
    }
}

fn protected_string(property: &str, value: Option<&str>) -> String {
    value
        .map(|v| format!("protected ${property} = {};", quote(v)))
        .unwrap_or_default()
}

fn public_bool(property: &str, value: Option<bool>) -> String {
    value
        .map(|v| format!("public ${property} = {v};"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ports::MockReporter,
        test_support::{StaticStubs, quiet_reporter},
    };

    fn model(yaml: &str) -> ModelRecord {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn render(stub: &str, yaml: &str) -> GeneratedArtifact {
        let stubs = StaticStubs::new().with(StubKind::Model, stub);
        let reporter = quiet_reporter();
        ModelGenerator::new(&stubs, &reporter)
            .generate("Order", "sales", &model(yaml))
            .unwrap()
    }

    #[test]
    fn path_and_class_identity() {
        let artifact = render("namespace {{namespace}};\nclass {{modelName}}\n{{tableName}}", "module: sales");
        assert_eq!(artifact.path.to_string(), "Modules/Sales/Models/Order.php");
        assert_eq!(
            artifact.content,
            "namespace App\\Modules\\Sales\\Models;\nclass Order\nprotected $table = 'orders';"
        );
    }

    #[test]
    fn fillable_skips_guarded_and_opted_out_fields() {
        let artifact = render(
            "[{{fillable}}] [{{guarded}}]",
            "fields:\n  name: {}\n  secret: { fillable: false }\n  token: {}\n  address: { partial: address.yaml }\nguarded: [token]\nfillable: [name, notes]\n",
        );
        assert_eq!(artifact.content, "['name', 'notes'] ['token']");
    }

    #[test]
    fn casts_follow_field_types() {
        let artifact = render(
            "{{casts}}",
            "fields:\n  active: { type: boolean }\n  total: { type: decimal, modifiers: { precision: \"10,4\" } }\n  title: {}\n",
        );
        assert_eq!(artifact.content, "'active' => 'boolean',\n        'total' => 'decimal:4'");
    }

    #[test]
    fn relations_render_with_imports() {
        let artifact = render(
            "{{imports}}\n--\n{{relations}}",
            "imports: ['\\Illuminate\\Support\\Str']\nrelations:\n  customer: { type: belongsTo, model: Customer }\n  parent: { type: belongsTo, model: Order }\n",
        );
        let (imports, relations) = artifact.content.split_once("\n--\n").unwrap();
        assert_eq!(
            imports,
            "use Illuminate\\Support\\Str;\nuse App\\Modules\\Sales\\Models\\Customer;"
        );
        assert!(relations.contains("public function customer()"));
        assert!(relations.contains("\n\n    public function parent()"));
    }

    #[test]
    fn unresolvable_relation_is_reported_and_skipped() {
        let stubs = StaticStubs::new().with(StubKind::Model, "{{relations}}");
        let mut reporter = MockReporter::new();
        reporter
            .expect_warning()
            .withf(|model, message| model == "Order" && message.contains("through"))
            .times(1)
            .return_const(());
        let artifact = ModelGenerator::new(&stubs, &reporter)
            .generate(
                "Order",
                "sales",
                &model("relations:\n  posts: { type: hasManyThrough }\n  customer: { type: belongsTo }\n"),
            )
            .unwrap();
        assert!(!artifact.content.contains("posts()"));
        assert!(artifact.content.contains("customer()"));
    }

    #[test]
    fn optional_properties_render_only_when_set() {
        let artifact = render(
            "{{softDeletes}}|{{traitImports}}|{{traitUses}}|{{displayFields}}|{{primaryKey}}|{{incrementing}}|{{timestamps}}|{{keyType}}|{{dateFormat}}",
            "softDeletes: true\ntraits: ['App\\Traits\\HasUuid', 'App\\Traits\\Auditable']\ndisplayFields: [code, name]\nprimaryKey: uuid\nincrementing: false\n",
        );
        assert_eq!(
            artifact.content,
            "use SoftDeletes;|use App\\Traits\\HasUuid;\nuse App\\Traits\\Auditable;|use HasUuid, Auditable;|protected $displayFields = ['code', 'name'];|protected $primaryKey = 'uuid';|public $incrementing = false;|||"
        );
    }

    #[test]
    fn events_rules_and_messages() {
        let artifact = render(
            "{{events}}\n{{rules}}\n{{messages}}\n{{bootMethods}}",
            "events: { created: OrderCreated::class }\nrules: { total: \"required|numeric\" }\nmessages: { total.required: \"Total can't be empty\" }\nbootMethods: [\"static::creating(fn ($m) => $m->uuid = Str::uuid());\"]\n",
        );
        assert_eq!(
            artifact.content,
            "'created' => OrderCreated::class,\n'total' => 'required|numeric',\n'total.required' => 'Total can\\'t be empty',\nstatic::creating(fn ($m) => $m->uuid = Str::uuid());"
        );
    }
}
