//! Relationship resolution.
//!
//! Turns a declared relation into an [`AccessorShape`] in which every key is
//! resolved, then renders that shape as a model accessor method. Defaults:
//!
//! | kind | defaults |
//! |---|---|
//! | belongsTo | `foreignKey = snake(relation)_id`, `ownerKey = id` |
//! | hasOne, hasMany | `foreignKey = snake(owner)_id`, `localKey = id` |
//! | belongsToMany, morphToMany | pivot = sorted singular snakes of both models; `foreignPivotKey = snake(owner)_id`, `relatedPivotKey = snake(related)_id` |
//! | morphedByMany | as above with the pivot keys swapped |
//! | morphTo, morphOne, morphMany | `name = relation`, `{name}_type`, `{name}_id` |
//! | hasOneThrough, hasManyThrough | `firstKey = snake(through)_id`, `secondKey = snake(related)_id` |
//!
//! Every other key defaults to `id`. When `model` is omitted the related
//! model is the studly singular of the relation name.

use crate::domain::{
    entities::schema::RelationDeclaration,
    error::DomainError,
    naming,
    value_objects::RelationKind,
};

/// A class a relation points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    /// Fully qualified, without a leading `\`.
    pub fqcn: String,
}

impl ClassRef {
    /// Resolve a model reference: a qualified path is kept, a bare name is
    /// placed in the models namespace of `module`.
    pub fn resolve(reference: &str, module: &str) -> Self {
        let trimmed = naming::trim_class(reference);
        let fqcn = if trimmed.contains('\\') {
            trimmed.to_string()
        } else {
            naming::model_class(module, trimmed)
        };
        Self { fqcn }
    }

    pub fn basename(&self) -> &str {
        naming::class_basename(&self.fqcn)
    }

    /// `snake(basename)`, the stem of default key names.
    pub fn snake(&self) -> String {
        naming::snake(self.basename())
    }

    pub fn import(&self) -> String {
        format!("use {};", self.fqcn)
    }
}

/// Key wiring of a resolved relation, one variant per accessor signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKeys {
    BelongsTo {
        foreign_key: String,
        owner_key: String,
    },
    HasOneOrMany {
        foreign_key: String,
        local_key: String,
    },
    Pivot {
        pivot_table: String,
        foreign_pivot_key: String,
        related_pivot_key: String,
        parent_key: String,
        related_key: String,
    },
    MorphPivot {
        name: String,
        morph_type: String,
        pivot_table: String,
        foreign_pivot_key: String,
        related_pivot_key: String,
        parent_key: String,
        related_key: String,
    },
    MorphTo {
        name: String,
        morph_type: String,
        morph_id: String,
        owner_key: String,
    },
    MorphOneOrMany {
        name: String,
        morph_type: String,
        morph_id: String,
        local_key: String,
    },
    Through {
        through: ClassRef,
        first_key: String,
        second_key: String,
        local_key: String,
        second_local_key: String,
    },
}

/// A fully resolved relation accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorShape {
    pub method: String,
    pub kind: RelationKind,
    /// `None` only for `morphTo`, whose target is chosen at runtime.
    pub related: Option<ClassRef>,
    pub keys: AccessorKeys,
}

/// Resolve a relation declared on `owning_model` in `owning_module`.
///
/// Only two inputs are ever required: a known kind, and `through` for the
/// through kinds.
pub fn build_relation_accessor(
    relation_name: &str,
    relation: &RelationDeclaration,
    owning_model: &str,
    owning_module: &str,
) -> Result<AccessorShape, DomainError> {
    let kind = relation.kind(relation_name)?;
    let module = relation.module.as_deref().unwrap_or(owning_module);
    let owner_snake = naming::snake(owning_model);
    let id = || "id".to_string();
    let or_id = |value: &Option<String>| value.clone().unwrap_or_else(id);

    let related = (kind != RelationKind::MorphTo).then(|| {
        let reference = relation
            .model
            .clone()
            .unwrap_or_else(|| naming::studly(&naming::singular(relation_name)));
        ClassRef::resolve(&reference, module)
    });
    let related_snake = related
        .as_ref()
        .map(ClassRef::snake)
        .unwrap_or_else(|| naming::snake(relation_name));
    let morph_name = relation
        .name
        .clone()
        .unwrap_or_else(|| relation_name.to_string());

    let keys = match kind {
        RelationKind::BelongsTo => AccessorKeys::BelongsTo {
            foreign_key: relation
                .foreign_key
                .clone()
                .unwrap_or_else(|| format!("{}_id", naming::snake(relation_name))),
            owner_key: or_id(&relation.owner_key),
        },
        RelationKind::HasOne | RelationKind::HasMany => AccessorKeys::HasOneOrMany {
            foreign_key: relation
                .foreign_key
                .clone()
                .unwrap_or_else(|| format!("{owner_snake}_id")),
            local_key: or_id(&relation.local_key),
        },
        RelationKind::BelongsToMany => AccessorKeys::Pivot {
            pivot_table: pivot_table_name(relation, owning_model, &related_snake),
            foreign_pivot_key: relation
                .foreign_pivot_key
                .clone()
                .unwrap_or_else(|| format!("{owner_snake}_id")),
            related_pivot_key: relation
                .related_pivot_key
                .clone()
                .unwrap_or_else(|| format!("{related_snake}_id")),
            parent_key: or_id(&relation.parent_key),
            related_key: or_id(&relation.related_key),
        },
        RelationKind::MorphToMany | RelationKind::MorphedByMany => {
            let (own_side, other_side) = if kind == RelationKind::MorphToMany {
                (&owner_snake, &related_snake)
            } else {
                (&related_snake, &owner_snake)
            };
            AccessorKeys::MorphPivot {
                morph_type: relation
                    .morph_type
                    .clone()
                    .unwrap_or_else(|| format!("{morph_name}_type")),
                name: morph_name,
                pivot_table: pivot_table_name(relation, owning_model, &related_snake),
                foreign_pivot_key: relation
                    .foreign_pivot_key
                    .clone()
                    .unwrap_or_else(|| format!("{own_side}_id")),
                related_pivot_key: relation
                    .related_pivot_key
                    .clone()
                    .unwrap_or_else(|| format!("{other_side}_id")),
                parent_key: or_id(&relation.parent_key),
                related_key: or_id(&relation.related_key),
            }
        }
        RelationKind::MorphTo => AccessorKeys::MorphTo {
            morph_type: relation
                .morph_type
                .clone()
                .unwrap_or_else(|| format!("{morph_name}_type")),
            morph_id: relation
                .morph_id
                .clone()
                .unwrap_or_else(|| format!("{morph_name}_id")),
            name: morph_name,
            owner_key: or_id(&relation.owner_key),
        },
        RelationKind::MorphOne | RelationKind::MorphMany => AccessorKeys::MorphOneOrMany {
            morph_type: relation
                .morph_type
                .clone()
                .unwrap_or_else(|| format!("{morph_name}_type")),
            morph_id: relation
                .morph_id
                .clone()
                .unwrap_or_else(|| format!("{morph_name}_id")),
            name: morph_name,
            local_key: or_id(&relation.local_key),
        },
        RelationKind::HasOneThrough | RelationKind::HasManyThrough => {
            let through = relation.through.as_deref().ok_or_else(|| {
                DomainError::MissingRelationInput {
                    relation: relation_name.to_string(),
                    kind: kind.as_str(),
                    attribute: "through",
                }
            })?;
            let through = ClassRef::resolve(through, module);
            AccessorKeys::Through {
                first_key: relation
                    .first_key
                    .clone()
                    .unwrap_or_else(|| format!("{}_id", through.snake())),
                second_key: relation
                    .second_key
                    .clone()
                    .unwrap_or_else(|| format!("{related_snake}_id")),
                local_key: or_id(&relation.local_key),
                second_local_key: or_id(&relation.second_local_key),
                through,
            }
        }
    };

    Ok(AccessorShape {
        method: relation_name.to_string(),
        kind,
        related,
        keys,
    })
}

/// Pivot table of a many-to-many relation.
///
/// The synthesized name sorts the two singular snake names, so both sides
/// of a mutual relation agree on one table.
pub fn pivot_table_name(relation: &RelationDeclaration, owning_model: &str, related_snake: &str) -> String {
    if let Some(table) = &relation.pivot_table {
        return table.clone();
    }
    let mut sides = [
        naming::singular(&naming::snake(owning_model)),
        naming::singular(related_snake),
    ];
    sides.sort();
    sides.join("_")
}

impl AccessorShape {
    /// Whether the UI should offer several related records at once.
    pub fn multi_select(&self) -> bool {
        self.kind.uses_pivot()
    }

    /// The foreign key a form field would carry, for kinds that have one.
    pub fn foreign_key(&self) -> Option<&str> {
        match &self.keys {
            AccessorKeys::BelongsTo { foreign_key, .. }
            | AccessorKeys::HasOneOrMany { foreign_key, .. } => Some(foreign_key),
            _ => None,
        }
    }

    /// `use` statements the accessor needs, excluding the owning class.
    pub fn imports(&self, owning_class: &str) -> Vec<String> {
        let through = match &self.keys {
            AccessorKeys::Through { through, .. } => Some(through),
            _ => None,
        };
        self.related
            .iter()
            .chain(through)
            .filter(|class| class.fqcn != owning_class)
            .map(ClassRef::import)
            .collect()
    }

    /// The accessor as a PHP method, indented for a class body.
    pub fn render_method(&self) -> String {
        let related = self
            .related
            .as_ref()
            .map(|class| format!("{}::class", class.basename()))
            .unwrap_or_default();
        let kind = self.kind.as_str();
        let q = |s: &str| naming::quote(s);

        let call = match &self.keys {
            AccessorKeys::BelongsTo {
                foreign_key,
                owner_key,
            } => format!("{kind}({related}, {}, {})", q(foreign_key), q(owner_key)),
            AccessorKeys::HasOneOrMany {
                foreign_key,
                local_key,
            } => format!("{kind}({related}, {}, {})", q(foreign_key), q(local_key)),
            AccessorKeys::Pivot {
                pivot_table,
                foreign_pivot_key,
                related_pivot_key,
                parent_key,
                related_key,
            } => format!(
                "{kind}({related}, {}, {}, {}, {}, {})",
                q(pivot_table),
                q(foreign_pivot_key),
                q(related_pivot_key),
                q(parent_key),
                q(related_key)
            ),
            AccessorKeys::MorphPivot {
                name,
                pivot_table,
                foreign_pivot_key,
                related_pivot_key,
                parent_key,
                related_key,
                ..
            } => format!(
                "{kind}({related}, {}, {}, {}, {}, {}, {})",
                q(name),
                q(pivot_table),
                q(foreign_pivot_key),
                q(related_pivot_key),
                q(parent_key),
                q(related_key)
            ),
            AccessorKeys::MorphTo {
                name,
                morph_type,
                morph_id,
                owner_key,
            } => format!(
                "{kind}({}, {}, {}, {})",
                q(name),
                q(morph_type),
                q(morph_id),
                q(owner_key)
            ),
            AccessorKeys::MorphOneOrMany {
                name,
                morph_type,
                morph_id,
                local_key,
            } => format!(
                "{kind}({related}, {}, {}, {}, {})",
                q(name),
                q(morph_type),
                q(morph_id),
                q(local_key)
            ),
            AccessorKeys::Through {
                through,
                first_key,
                second_key,
                local_key,
                second_local_key,
            } => {
                let args = [
                    related.clone(),
                    format!("{}::class", through.basename()),
                    q(first_key),
                    q(second_key),
                    q(local_key),
                    q(second_local_key),
                ];
                format!(
                    "{kind}(\n            {}\n        )",
                    args.join(",\n            ")
                )
            }
        };

        format!(
            "    public function {}()\n    {{\n        return $this->{call};\n    }}",
            self.method
        )
    }
}

// ── Pivot migrations ─────────────────────────────────────────────────────────

/// A join table implied by a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotPlan {
    /// belongsToMany: two foreign ids.
    Plain {
        table: String,
        first_table: String,
        first_key: String,
        second_table: String,
        second_key: String,
    },
    /// morphToMany: a morph id/type pair plus the related foreign id.
    Polymorphic {
        table: String,
        owner: String,
        morph_id: String,
        morph_type: String,
        related_table: String,
        related_pivot_key: String,
    },
}

impl PivotPlan {
    pub fn table(&self) -> &str {
        match self {
            Self::Plain { table, .. } | Self::Polymorphic { table, .. } => table,
        }
    }
}

/// The join table a relation needs created, if any.
///
/// A `morphToMany` pivot is only planned from an explicit `pivotTable`; its
/// absence is reported as missing input.
pub fn pivot_plan(
    relation_name: &str,
    relation: &RelationDeclaration,
    owning_model: &str,
    owning_module: &str,
) -> Result<Option<PivotPlan>, DomainError> {
    let kind = relation.kind(relation_name)?;
    if !matches!(kind, RelationKind::BelongsToMany | RelationKind::MorphToMany) {
        return Ok(None);
    }
    let shape = build_relation_accessor(relation_name, relation, owning_model, owning_module)?;
    let related_table = shape
        .related
        .as_ref()
        .map(|class| naming::plural(&class.snake()))
        .unwrap_or_default();

    Ok(match shape.keys {
        AccessorKeys::Pivot {
            pivot_table,
            foreign_pivot_key,
            related_pivot_key,
            ..
        } => Some(PivotPlan::Plain {
            table: pivot_table,
            first_table: naming::plural(&naming::snake(owning_model)),
            first_key: foreign_pivot_key,
            second_table: related_table,
            second_key: related_pivot_key,
        }),
        AccessorKeys::MorphPivot {
            morph_type,
            foreign_pivot_key,
            related_pivot_key,
            ..
        } => {
            let table = relation.pivot_table.clone().ok_or_else(|| {
                DomainError::MissingRelationInput {
                    relation: relation_name.to_string(),
                    kind: kind.as_str(),
                    attribute: "pivotTable",
                }
            })?;
            Some(PivotPlan::Polymorphic {
                table,
                owner: naming::snake(owning_model),
                morph_id: foreign_pivot_key,
                morph_type,
                related_table,
                related_pivot_key,
            })
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(yaml: &str) -> RelationDeclaration {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn shape(name: &str, yaml: &str, owner: &str) -> AccessorShape {
        build_relation_accessor(name, &relation(yaml), owner, "sales").unwrap()
    }

    #[test]
    fn belongs_to_key_comes_from_relation_name() {
        let shape = shape("author", "type: belongsTo\nmodel: User", "Post");
        assert_eq!(
            shape.keys,
            AccessorKeys::BelongsTo {
                foreign_key: "author_id".into(),
                owner_key: "id".into()
            }
        );
        assert_eq!(
            shape.render_method(),
            "    public function author()\n    {\n        return $this->belongsTo(User::class, 'author_id', 'id');\n    }"
        );
    }

    #[test]
    fn has_many_key_comes_from_owning_model() {
        let shape = shape("items", "type: hasMany", "Order");
        assert_eq!(shape.foreign_key(), Some("order_id"));
        assert_eq!(
            shape.related.as_ref().unwrap().fqcn,
            "App\\Modules\\Sales\\Models\\Item"
        );
    }

    #[test]
    fn every_kind_resolves_with_no_overrides() {
        for kind in RelationKind::ALL {
            let mut yaml = format!("type: {kind}");
            if matches!(kind, RelationKind::HasOneThrough | RelationKind::HasManyThrough) {
                yaml.push_str("\nthrough: Order");
            }
            let shape = build_relation_accessor("lines", &relation(&yaml), "Invoice", "billing")
                .unwrap_or_else(|e| panic!("{kind}: {e}"));
            let method = shape.render_method();
            assert!(!method.contains("''"), "{kind}: {method}");
            assert!(method.contains(&format!("$this->{kind}(")), "{kind}");
        }
    }

    #[test]
    fn mutual_pivots_agree() {
        let a = shape("tags", "type: belongsToMany\nmodel: Tag", "Post");
        let b = shape("posts", "type: belongsToMany\nmodel: Post", "Tag");
        let table = |s: &AccessorShape| match &s.keys {
            AccessorKeys::Pivot { pivot_table, .. } => pivot_table.clone(),
            other => panic!("{other:?}"),
        };
        assert_eq!(table(&a), "post_tag");
        assert_eq!(table(&a), table(&b));
        assert!(a.multi_select());
    }

    #[test]
    fn morphed_by_many_mirrors_pivot_keys() {
        let to_many = shape("tags", "type: morphToMany\nmodel: Tag\nname: taggable", "Post");
        let by_many = shape("posts", "type: morphedByMany\nmodel: Post\nname: taggable", "Tag");
        match (&to_many.keys, &by_many.keys) {
            (
                AccessorKeys::MorphPivot {
                    foreign_pivot_key: a_fk,
                    related_pivot_key: a_rk,
                    ..
                },
                AccessorKeys::MorphPivot {
                    foreign_pivot_key: b_fk,
                    related_pivot_key: b_rk,
                    ..
                },
            ) => {
                assert_eq!((a_fk.as_str(), a_rk.as_str()), ("post_id", "tag_id"));
                assert_eq!((b_fk.as_str(), b_rk.as_str()), ("post_id", "tag_id"));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn morph_to_derives_columns_from_name() {
        let shape = shape("commentable", "type: morphTo", "Comment");
        assert!(shape.related.is_none());
        assert!(shape.imports("App\\Modules\\Sales\\Models\\Comment").is_empty());
        assert!(
            shape
                .render_method()
                .contains("morphTo('commentable', 'commentable_type', 'commentable_id', 'id')")
        );
    }

    #[test]
    fn through_requires_intermediate_model() {
        let err = build_relation_accessor(
            "comments",
            &relation("type: hasManyThrough\nmodel: Comment"),
            "Country",
            "blog",
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRelationInput {
                relation: "comments".into(),
                kind: "hasManyThrough",
                attribute: "through"
            }
        );
    }

    #[test]
    fn through_renders_six_arguments() {
        let shape = shape("posts", "type: hasManyThrough\nmodel: Post\nthrough: User", "Country");
        assert_eq!(
            shape.render_method(),
            "    public function posts()\n    {\n        return $this->hasManyThrough(\n            Post::class,\n            User::class,\n            'user_id',\n            'post_id',\n            'id',\n            'id'\n        );\n    }"
        );
        assert_eq!(shape.imports("x").len(), 2);
    }

    #[test]
    fn qualified_models_and_self_references() {
        let shape = shape("owner", "type: belongsTo\nmodel: \\App\\Models\\User", "Team");
        assert_eq!(shape.imports("App\\Modules\\Sales\\Models\\Team"), ["use App\\Models\\User;"]);

        let parent = self::shape("parent", "type: belongsTo\nmodel: Category", "Category");
        assert!(parent.imports("App\\Modules\\Sales\\Models\\Category").is_empty());
    }

    #[test]
    fn unknown_kind_names_the_relation() {
        let err = build_relation_accessor("x", &relation("type: manyToMany"), "A", "b").unwrap_err();
        assert!(matches!(err, DomainError::UnknownRelationKind { relation, .. } if relation == "x"));
    }

    #[test]
    fn pivot_plans() {
        let plan = pivot_plan("tags", &relation("type: belongsToMany\nmodel: Tag"), "BlogPost", "blog")
            .unwrap()
            .unwrap();
        assert_eq!(
            plan,
            PivotPlan::Plain {
                table: "blog_post_tag".into(),
                first_table: "blog_posts".into(),
                first_key: "blog_post_id".into(),
                second_table: "tags".into(),
                second_key: "tag_id".into(),
            }
        );

        let missing = pivot_plan("tags", &relation("type: morphToMany\nmodel: Tag"), "Post", "blog");
        assert!(matches!(
            missing,
            Err(DomainError::MissingRelationInput { attribute: "pivotTable", .. })
        ));

        let morph = pivot_plan(
            "tags",
            &relation("type: morphToMany\nmodel: Tag\nname: taggable\npivotTable: taggables"),
            "Post",
            "blog",
        )
        .unwrap()
        .unwrap();
        assert_eq!(morph.table(), "taggables");

        assert!(pivot_plan("author", &relation("type: belongsTo"), "Post", "blog").unwrap().is_none());
    }
}
