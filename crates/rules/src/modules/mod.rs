//! Built-in rule modules, one per report category.

pub mod accessibility;
pub mod efficiency;
pub mod features;
pub mod license;
pub mod reuse;
pub mod statistics;

#[cfg(test)]
pub(crate) mod testing;

use caretaker_core::types::Category;

use crate::error::RuleError;
use crate::module::RuleModule;

pub use accessibility::AccessibilityRules;
pub use efficiency::EfficiencyRules;
pub use features::FeatureRules;
pub use license::LicenseRules;
pub use reuse::ReuseRules;
pub use statistics::StatisticsRules;

/// Creates the built-in module for `category`.
pub fn module_for(category: Category) -> Result<Box<dyn RuleModule>, RuleError> {
    Ok(match category {
        Category::Accessibility => Box::new(AccessibilityRules),
        Category::License => Box::new(LicenseRules::new()?),
        Category::Efficiency => Box::new(EfficiencyRules),
        Category::Features => Box::new(FeatureRules),
        Category::Reuse => Box::new(ReuseRules),
        Category::Statistics => Box::new(StatisticsRules),
    })
}
