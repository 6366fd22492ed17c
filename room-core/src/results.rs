use room_types::{JudgeCountList, ResultUser, UserId};

/// Per-tier hit counts submitted at the end of a live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JudgeCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl JudgeCounts {
    pub fn total_notes(&self) -> u64 {
        self.to_list().iter().map(|&count| u64::from(count)).sum()
    }

    pub fn to_list(&self) -> JudgeCountList {
        [self.perfect, self.great, self.good, self.bad, self.miss]
    }
}

impl From<JudgeCountList> for JudgeCounts {
    fn from(list: JudgeCountList) -> Self {
        let [perfect, great, good, bad, miss] = list;
        Self {
            perfect,
            great,
            good,
            bad,
            miss,
        }
    }
}

/// A member's row as stored: the score stays empty until the member submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberScore {
    pub user_id: UserId,
    pub judge_counts: JudgeCounts,
    pub score: Option<u32>,
}

impl MemberScore {
    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }
}

/// Room-level roll-up. Members who have not submitted are left out.
pub fn collect_results(members: impl IntoIterator<Item = MemberScore>) -> Vec<ResultUser> {
    members
        .into_iter()
        .filter_map(|member| {
            member.score.map(|score| ResultUser {
                user_id: member.user_id,
                judge_count_list: member.judge_counts.to_list(),
                score,
            })
        })
        .collect()
}
