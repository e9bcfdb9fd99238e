use serde::Deserialize;

// ?d= 覆盖星期
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub d: Option<String>,
}

// ?d=&t= 覆盖星期与时间
#[derive(Debug, Default, Deserialize)]
pub struct OngoingQuery {
    pub d: Option<String>,
    pub t: Option<String>,
}
