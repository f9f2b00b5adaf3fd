//! Tool implementations for the care team
//!
//! Each robot carries exactly one onboard system, exposed as a tool:
//! - `navigation_tool`: location tracking and path planning
//! - `collection_tool`: ID-card onboarding scanner
//! - `display_tool`: info sharing display

pub mod care;
pub mod schema;

mod executor;

pub use executor::CareToolExecutor;
pub use schema::FunctionSchemaConverter;

use crew_domain::tool::entities::ToolSpec;

/// Create the tool specification with every care-team tool
pub fn care_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(care::navigation_tool_definition())
        .register(care::collection_tool_definition())
        .register(care::display_tool_definition())
}
