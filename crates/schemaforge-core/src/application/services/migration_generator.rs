//! Create-table migrations for a model and the join tables its relations imply.

use tracing::debug;

use crate::{
    application::{
        ports::{Reporter, StubStore},
        sequencing::MigrationPaths,
    },
    domain::{
        ArtifactKind, GeneratedArtifact, ModelRecord, PivotPlan, StubContext, StubKind, columns,
        pivot_plan,
    },
    error::ForgeResult,
};

pub struct MigrationGenerator<'a> {
    stubs: &'a dyn StubStore,
    reporter: &'a dyn Reporter,
}

impl<'a> MigrationGenerator<'a> {
    pub fn new(stubs: &'a dyn StubStore, reporter: &'a dyn Reporter) -> Self {
        Self { stubs, reporter }
    }

    /// The model's own migration.
    ///
    /// A missing stub fails the artifact; the caller decides what to do next.
    pub fn generate_main(
        &self,
        paths: &mut MigrationPaths<'_>,
        model_name: &str,
        module: &str,
        model: &ModelRecord,
    ) -> ForgeResult<GeneratedArtifact> {
        let stub = self.stubs.load(StubKind::Migration, module, model_name)?;
        let table = model.table_name(model_name);
        let path = paths.allocate_for_table(module, &table)?;

        let content = StubContext::new()
            .with("modelName", model_name)
            .with("tableName", table.as_str())
            .with("columns", columns::render_columns(model))
            .with("indexes", columns::render_indexes(model))
            .with("timestamps", if model.has_timestamps() { "$table->timestamps();" } else { "" })
            .with("softDeletes", if model.soft_deletes { "$table->softDeletes();" } else { "" })
            .render(&stub);

        debug!(model = model_name, %path, "Main migration rendered");
        Ok(GeneratedArtifact::new(ArtifactKind::Migration, path, content))
    }

    /// One migration per belongsToMany / morphToMany relation.
    ///
    /// Relations that cannot be planned are reported and skipped; stub
    /// failures are returned alongside the artifacts that did render.
    pub fn generate_pivots(
        &self,
        paths: &mut MigrationPaths<'_>,
        model_name: &str,
        module: &str,
        model: &ModelRecord,
    ) -> (Vec<GeneratedArtifact>, Vec<crate::error::ForgeError>) {
        let mut artifacts = Vec::new();
        let mut failures = Vec::new();

        for (relation_name, relation) in &model.relations {
            let plan = match pivot_plan(relation_name, relation, model_name, module) {
                Ok(Some(plan)) => plan,
                Ok(None) => continue,
                Err(e) => {
                    self.reporter.warning(model_name, &e.to_string());
                    continue;
                }
            };
            match self.render_pivot(paths, model_name, module, &plan) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => failures.push(e),
            }
        }

        (artifacts, failures)
    }

    fn render_pivot(
        &self,
        paths: &mut MigrationPaths<'_>,
        model_name: &str,
        module: &str,
        plan: &PivotPlan,
    ) -> ForgeResult<GeneratedArtifact> {
        let (kind, context) = match plan {
            PivotPlan::Plain {
                table,
                first_table,
                first_key,
                second_table,
                second_key,
            } => (
                StubKind::PivotMigration,
                StubContext::new()
                    .with("pivotTableName", table.as_str())
                    .with("model1", first_table.as_str())
                    .with("model2", second_table.as_str())
                    .with("foreignKey1", first_key.as_str())
                    .with("foreignKey2", second_key.as_str()),
            ),
            PivotPlan::Polymorphic {
                table,
                owner,
                morph_id,
                morph_type,
                related_table,
                related_pivot_key,
            } => (
                StubKind::PolymorphicPivotMigration,
                StubContext::new()
                    .with("pivotTableName", table.as_str())
                    .with("modelName", owner.as_str())
                    .with("foreignKey", morph_id.as_str())
                    .with("morphType", morph_type.as_str())
                    .with("relatedTable", related_table.as_str())
                    .with("relatedPivotKey", related_pivot_key.as_str()),
            ),
        };

        let stub = self.stubs.load(kind, module, model_name)?;
        let path = paths.allocate_for_table(module, plan.table())?;
        Ok(GeneratedArtifact::new(
            ArtifactKind::PivotMigration,
            path,
            context.render(&stub),
        ))
    }
}
