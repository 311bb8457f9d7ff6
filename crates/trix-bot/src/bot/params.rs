/// Tunable weights shared by the planners.
#[derive(Debug, Clone, PartialEq)]
pub struct BotParams {
    /// Weight applied to penalty points that would land on us.
    pub play_capture_penalty_mult: i32,
    /// Reward for every penalty point sent to another seat.
    pub play_dump_penalty_mult: i32,
    /// Per-rank nudge when ducking so the highest safe card goes first.
    pub play_duck_rank_mult: i32,
    pub play_lead_rank_mult: i32,
    pub play_lead_penalty_suit: i32,
    pub play_lead_exposed_honour: i32,
    pub play_lead_void_bonus: i32,
    pub play_partner_dump_penalty: i32,
    /// Probability (percent) that easy bots take the lower of two draws.
    pub easy_low_bias_pct: u32,
    pub layout_unlock_weight: i32,
    pub layout_jack_bonus: i32,
    pub layout_long_suit_weight: i32,
    pub contract_king_holder_risk: i32,
    pub contract_queen_risk: i32,
    pub contract_jack_risk: i32,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            play_capture_penalty_mult: 4,
            play_dump_penalty_mult: 3,
            play_duck_rank_mult: 2,
            play_lead_rank_mult: -3,
            play_lead_penalty_suit: -40,
            play_lead_exposed_honour: -30,
            play_lead_void_bonus: 12,
            play_partner_dump_penalty: -200,
            easy_low_bias_pct: 70,
            layout_unlock_weight: 10,
            layout_jack_bonus: 6,
            layout_long_suit_weight: 2,
            contract_king_holder_risk: 120,
            contract_queen_risk: 18,
            contract_jack_risk: 9,
        }
    }
}
