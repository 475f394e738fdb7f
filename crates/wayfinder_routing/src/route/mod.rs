mod flatten;
mod model;

pub use flatten::{StepCursor, StepIndex};
pub use model::{
    IndoorFeature, IndoorLeg, Leg, LegBody, LegEndpoint, Maneuver, Provenance, Route, Step,
    TransitAgency, TransitLeg, TransitLine, WalkLeg,
};
