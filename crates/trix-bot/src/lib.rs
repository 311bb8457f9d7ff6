pub mod bot;
pub mod policy;

pub use bot::{
    BotContext, BotDifficulty, BotParams, ContractPlanner, DoublingPlanner, LayoutPlanner,
    PlayPlanner, UnknownDifficulty, VoidTracker,
};
pub use policy::{HeuristicPolicy, Policy};
