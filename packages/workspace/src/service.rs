//! Funnel-level operations over the document backend.

use crate::backend::DocumentBackend;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::external::with_timeout;
use crate::publish::mark_published;
use chrono::{DateTime, Utc};
use funnel_catalog::{TemplateCatalog, TemplateType};
use funnel_model::{
    document_seed, serialize_elements, Element, Funnel, FunnelRecord, FunnelStep, IdGenerator,
};
use std::sync::Arc;
use tracing::info;

pub struct FunnelService<B> {
    backend: Arc<B>,
    catalog: TemplateCatalog,
    config: SyncConfig,
}

impl<B: DocumentBackend> FunnelService<B> {
    pub fn new(backend: Arc<B>, catalog: TemplateCatalog, config: SyncConfig) -> Self {
        Self {
            backend,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Create one draft record per template page.
    ///
    /// Step document ids are `<funnel id>-<n>`; every element gets a fresh id
    /// from its step's generator.
    pub async fn create_from_template(
        &self,
        user_id: &str,
        name: &str,
        template_type: TemplateType,
        now: DateTime<Utc>,
    ) -> SyncResult<Funnel> {
        let template = self
            .catalog
            .get(template_type)
            .ok_or_else(|| SyncError::NotFound(format!("template {}", template_type)))?;

        let funnel_id = document_seed(&format!(
            "{}/{}/{}",
            user_id,
            name,
            now.timestamp_nanos_opt().unwrap_or_default()
        ));
        let mut step_ids = IdGenerator::from_seed(funnel_id.clone());
        let mut steps = Vec::with_capacity(template.pages.len());

        for page in &template.pages {
            let document_id = step_ids.new_id();
            let page = page.with_fresh_ids(&mut IdGenerator::new(&document_id));
            let record = FunnelRecord::draft(
                document_id.clone(),
                format!("{} - {}", name, page.name),
                user_id,
                &page.content,
                now,
            )?;

            with_timeout(self.config.write_timeout(), self.backend.upsert(record)).await?;

            steps.push(FunnelStep {
                document_id,
                name: page.name,
                page_type: page.page_type,
            });
        }

        info!(
            funnel_id = %funnel_id,
            template = template_type.as_str(),
            steps = steps.len(),
            "Funnel created"
        );

        Ok(Funnel {
            id: funnel_id,
            name: name.to_string(),
            steps,
        })
    }

    pub async fn get(&self, document_id: &str) -> SyncResult<FunnelRecord> {
        with_timeout(self.config.load_timeout(), self.backend.get_by_id(document_id))
            .await?
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))
    }

    /// Publish a document. Idempotent; there is no way back to draft.
    pub async fn publish(&self, document_id: &str, now: DateTime<Utc>) -> SyncResult<FunnelRecord> {
        let mut record = self.get(document_id).await?;

        if mark_published(&mut record) {
            record.updated_at = now;
            with_timeout(self.config.write_timeout(), self.backend.upsert(record.clone())).await?;
            info!(
                document_id,
                url = record.published_url.as_deref().unwrap_or_default(),
                "Published"
            );
        }

        Ok(record)
    }

    pub async fn delete(&self, document_id: &str) -> SyncResult<()> {
        with_timeout(self.config.write_timeout(), self.backend.delete(document_id)).await?;
        info!(document_id, "Document deleted");
        Ok(())
    }

    /// Delete one step of `funnel` and deactivate every rule in the remaining
    /// steps that targets it. Returns the number of rules deactivated.
    pub async fn delete_step(&self, funnel: &mut Funnel, document_id: &str) -> SyncResult<usize> {
        let index = funnel
            .step_index(document_id)
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))?;

        self.delete(document_id).await?;
        funnel.steps.remove(index);

        let mut deactivated = 0;
        for step in &funnel.steps {
            let mut record = self.get(&step.document_id).await?;
            let mut elements = record.elements()?;
            let count = deactivate_rules_targeting(&mut elements, document_id);
            if count == 0 {
                continue;
            }

            record.content = serialize_elements(&elements)?;
            record.updated_at = Utc::now();
            with_timeout(self.config.write_timeout(), self.backend.upsert(record)).await?;
            deactivated += count;
        }

        info!(
            funnel_id = %funnel.id,
            document_id,
            deactivated,
            "Funnel step deleted"
        );
        Ok(deactivated)
    }

    /// Delete every step of a funnel. Stops at the first failure.
    pub async fn delete_funnel(&self, funnel: &Funnel) -> SyncResult<()> {
        for step in &funnel.steps {
            self.delete(&step.document_id).await?;
        }
        Ok(())
    }
}

fn deactivate_rules_targeting(elements: &mut [Element], target: &str) -> usize {
    let mut count = 0;
    for rule in elements.iter_mut().flat_map(|el| el.conditions.iter_mut()) {
        if rule.is_active && rule.target() == target {
            rule.is_active = false;
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::TimeZone;
    use funnel_catalog::Registry;
    use funnel_model::{ConditionRule, ElementType, RuleType};

    #[test]
    fn test_only_rules_targeting_the_step_are_deactivated() {
        let mut elements = vec![
            Element::text("b", ElementType::Button, "Go")
                .with_condition(ConditionRule::new("r1", "b", RuleType::Goto).with_target("gone"))
                .with_condition(ConditionRule::new("r2", "b", RuleType::Goto).with_target("kept")),
            Element::text("h", ElementType::Headline, "Hi")
                .with_condition(ConditionRule::new("r3", "h", RuleType::Hide)),
        ];

        assert_eq!(deactivate_rules_targeting(&mut elements, "gone"), 1);
        assert!(!elements[0].conditions[0].is_active);
        assert!(elements[0].conditions[1].is_active);
        assert!(elements[1].conditions[0].is_active);
        assert_eq!(deactivate_rules_targeting(&mut elements, "gone"), 0);
    }

    #[tokio::test]
    async fn test_delete_step_requires_membership() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let backend = Arc::new(MemoryBackend::new());
        let catalog = TemplateCatalog::standard(&Registry::standard(), now);
        let service = FunnelService::new(backend.clone(), catalog, SyncConfig::default());
        let mut funnel = service
            .create_from_template("user-1", "Lead", TemplateType::LeadMagnet, now)
            .await
            .unwrap();
        let steps = funnel.steps.len();

        assert_eq!(
            service.delete_step(&mut funnel, "elsewhere").await,
            Err(SyncError::NotFound("elsewhere".into()))
        );
        assert_eq!(funnel.steps.len(), steps);
        assert_eq!(backend.ids().len(), steps);
    }
}
