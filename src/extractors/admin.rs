use tracing::{error, info};

use super::{pause, tag, ExtractContext};
use crate::config::Config;
use crate::error::Result;
use crate::models::{AdministrativeFile, BoundaryEntry};
use crate::output::{now, save_json};
use crate::overpass::{queries, Relation};

/// Administrative boundary extraction
pub struct AdminExtractor<'a> {
    ctx: ExtractContext<'a>,
}

impl<'a> AdminExtractor<'a> {
    pub fn new(ctx: ExtractContext<'a>) -> Self {
        Self { ctx }
    }

    /// Named relations at a configured admin level across the whole country
    pub async fn extract_country(&self) -> Result<Vec<BoundaryEntry>> {
        let config = self.ctx.config;
        info!(
            "Extracting administrative hierarchy for {}",
            config.global.country
        );

        let result = self
            .ctx
            .client
            .query(&queries::country_admin(&config.global.country))
            .await?;

        let boundaries: Vec<BoundaryEntry> = result
            .relations()
            .iter()
            .filter_map(|relation| country_boundary(relation, config))
            .collect();

        let path = self.ctx.layout.administrative(&config.global.country_slug);
        save_json(&AdministrativeFile::new(now(), boundaries.clone()), &path)?;
        info!("Administrative data saved: {} entries", boundaries.len());

        Ok(boundaries)
    }

    /// Every administrative relation inside a region, with members
    pub async fn extract_region(&self, region: &str) -> Result<Vec<BoundaryEntry>> {
        info!("Extracting admin boundaries for {}", region);

        let result = self
            .ctx
            .client
            .query(&queries::region_admin(region))
            .await?;

        let boundaries: Vec<BoundaryEntry> = result
            .relations()
            .iter()
            .map(|relation| region_boundary(relation, self.ctx.config))
            .collect();

        let path = self.ctx.layout.administrative(region);
        save_json(&AdministrativeFile::new(now(), boundaries.clone()), &path)?;
        info!("{}: {} admin boundaries saved", region, boundaries.len());

        Ok(boundaries)
    }

    /// Per-region boundaries for each region, returning how many succeeded
    pub async fn extract_regions(&self, regions: &[String]) -> usize {
        let mut saved = 0;
        for (i, region) in regions.iter().enumerate() {
            match self.extract_region(region).await {
                Ok(_) => saved += 1,
                Err(e) => error!("Failed to extract admin boundaries for {}: {}", region, e),
            }
            if i + 1 < regions.len() {
                pause(self.ctx.config.delays.region_secs).await;
            }
        }
        saved
    }

    /// Country extraction that logs instead of failing
    pub async fn extract_country_or_empty(&self) -> Vec<BoundaryEntry> {
        match self.extract_country().await {
            Ok(boundaries) => boundaries,
            Err(e) => {
                error!("Failed to extract administrative data: {}", e);
                Vec::new()
            }
        }
    }
}

/// Keeps relations with a name and a configured admin level
pub fn country_boundary(relation: &Relation, config: &Config) -> Option<BoundaryEntry> {
    let name = tag(&relation.tags, "name")?;
    let admin_level = relation.tags.get("admin_level")?;
    let admin_type = config.admin_levels.get(admin_level)?;

    Some(BoundaryEntry {
        id: Some(relation.id),
        name,
        admin_level: admin_level.clone(),
        admin_type: Some(admin_type.clone()),
        relation_type: tag(&relation.tags, "type"),
        postal_code: tag(&relation.tags, "postal_code"),
        population: tag(&relation.tags, "population"),
        wikidata: tag(&relation.tags, "wikidata"),
        wikipedia: tag(&relation.tags, "wikipedia"),
        members_count: Some(relation.members.len()),
        tags: relation.tags.clone(),
        ..Default::default()
    })
}

pub fn region_boundary(relation: &Relation, config: &Config) -> BoundaryEntry {
    let admin_level = relation.tags.get("admin_level").cloned().unwrap_or_default();
    BoundaryEntry {
        id: Some(relation.id),
        name: relation.tags.get("name").cloned().unwrap_or_default(),
        admin_type: Some(config.admin_type(&admin_level).to_string()),
        admin_level,
        postal_code: tag(&relation.tags, "postal_code"),
        boundary_type: tag(&relation.tags, "boundary"),
        members_count: Some(relation.members.len()),
        members: relation.members.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelationMember;
    use std::collections::BTreeMap;

    fn relation(id: i64, tags: &[(&str, &str)]) -> Relation {
        Relation {
            id,
            members: vec![RelationMember {
                member_type: "way".to_string(),
                member_ref: 99,
                role: "outer".to_string(),
            }],
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_country_boundary_filters() {
        let config = Config::default();

        let ankara = relation(
            1,
            &[
                ("name", "Ankara"),
                ("admin_level", "4"),
                ("population", "5663322"),
                ("wikidata", "Q2297724"),
            ],
        );
        let entry = country_boundary(&ankara, &config).unwrap();
        assert_eq!(entry.admin_type.as_deref(), Some("province"));
        assert_eq!(entry.population.as_deref(), Some("5663322"));
        assert_eq!(entry.members_count, Some(1));
        assert!(entry.members.is_empty());
        assert_eq!(entry.tags.len(), 4);

        assert!(country_boundary(&relation(2, &[("admin_level", "4")]), &config).is_none());
        assert!(
            country_boundary(&relation(3, &[("name", "X"), ("admin_level", "11")]), &config)
                .is_none()
        );
    }

    #[test]
    fn test_region_boundary_keeps_everything() {
        let config = Config::default();
        let entry = region_boundary(&relation(5, &[("boundary", "administrative")]), &config);
        assert_eq!(entry.name, "");
        assert_eq!(entry.admin_level, "");
        assert_eq!(entry.admin_type.as_deref(), Some("unknown"));
        assert_eq!(entry.boundary_type.as_deref(), Some("administrative"));
        assert_eq!(entry.members[0].member_ref, 99);
    }
}
