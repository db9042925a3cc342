// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Random but reproducible catalogs for exercising catalog consumers.

use crate::types::{CatalogResponse, Plan, Service};
use rand::seq::SliceRandom;
use rand::Rng;

const SERVICE_NAMES: [&str; 8] = [
    "redis", "postgres", "mysql", "rabbitmq", "kafka", "mongodb", "elastic", "memcached",
];
const PLAN_NAMES: [&str; 5] = ["nano", "small", "medium", "large", "xlarge"];
const TAGS: [&str; 6] = ["cache", "database", "queue", "sql", "nosql", "search"];

/// Shape of the catalogs [`CatalogGenerator::generate`] produces. All
/// randomness comes from the `Rng` passed in, so a seeded rng gives the same
/// catalog every time.
#[derive(Clone, Debug)]
pub struct CatalogGenerator {
    pub services: usize,
    pub plans_per_service: usize,
    pub tags_per_service: usize,
}

impl Default for CatalogGenerator {
    fn default() -> Self {
        Self {
            services: 3,
            plans_per_service: 2,
            tags_per_service: 2,
        }
    }
}

impl CatalogGenerator {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CatalogResponse {
        let services = (0..self.services)
            .map(|i| self.service(rng, i))
            .collect();
        CatalogResponse { services }
    }

    fn service<R: Rng + ?Sized>(&self, rng: &mut R, index: usize) -> Service {
        let base = SERVICE_NAMES[index % SERVICE_NAMES.len()];
        let name = if index < SERVICE_NAMES.len() {
            base.to_string()
        } else {
            format!("{}-{}", base, index / SERVICE_NAMES.len())
        };

        let tags = TAGS
            .choose_multiple(rng, self.tags_per_service.min(TAGS.len()))
            .map(|t| t.to_string())
            .collect();

        let plans = (0..self.plans_per_service)
            .map(|i| plan(rng, &name, i))
            .collect();

        Service {
            id: guid(rng),
            description: format!("{} service", name),
            name,
            tags,
            bindable: rng.gen_bool(0.8),
            plan_updateable: Some(rng.gen()),
            plans,
            ..Default::default()
        }
    }
}

fn plan<R: Rng + ?Sized>(rng: &mut R, service: &str, index: usize) -> Plan {
    let size = PLAN_NAMES[index % PLAN_NAMES.len()];
    Plan {
        id: guid(rng),
        name: size.to_string(),
        description: format!("{} {} plan", size, service),
        free: Some(index == 0),
        ..Default::default()
    }
}

/// Random lowercase GUID in the 8-4-4-4-12 layout
fn guid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
