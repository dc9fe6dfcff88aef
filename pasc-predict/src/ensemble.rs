use pasc_core::{PascError, Predictor, Word};

/// Index of the member whose prediction missed `value` by the least.
/// Ties go to the lowest index.
fn best_member<W: Word>(members: &[Box<dyn Predictor<W>>], value: W) -> usize {
    members
        .iter()
        .enumerate()
        .map(|(i, member)| (member.predict().abs_diff_bits(value), i))
        .min()
        .map_or(0, |(_, i)| i)
}

fn check_members<W: Word>(members: &[Box<dyn Predictor<W>>]) -> Result<(), PascError> {
    if members.is_empty() {
        return Err(PascError::InvalidParameter(
            "ensemble needs at least one member".to_string(),
        ));
    }
    Ok(())
}

fn member_names<W: Word>(members: &[Box<dyn Predictor<W>>]) -> String {
    members
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Uses whichever member was closest on the previous step.
pub struct LastBest<W: Word> {
    members: Vec<Box<dyn Predictor<W>>>,
    last_best: usize,
}

impl<W: Word> LastBest<W> {
    pub fn new(members: Vec<Box<dyn Predictor<W>>>) -> Result<Self, PascError> {
        check_members(&members)?;
        Ok(Self {
            members,
            last_best: 0,
        })
    }

    pub fn last_best(&self) -> usize {
        self.last_best
    }
}

impl<W: Word> Predictor<W> for LastBest<W> {
    fn predict(&self) -> W {
        self.members[self.last_best].predict()
    }

    fn update(&mut self, value: W) {
        self.last_best = best_member(&self.members, value);
        self.members.iter_mut().for_each(|m| m.update(value));
    }

    fn reset(&mut self) {
        self.members.iter_mut().for_each(|m| m.reset());
        self.last_best = 0;
    }

    fn name(&self) -> String {
        format!("LastBest [{}]", member_names(&self.members))
    }
}

/// Uses the member that has been closest most often so far.
pub struct MostRight<W: Word> {
    members: Vec<Box<dyn Predictor<W>>>,
    wins: Vec<u64>,
    overall_best: usize,
}

impl<W: Word> MostRight<W> {
    pub fn new(members: Vec<Box<dyn Predictor<W>>>) -> Result<Self, PascError> {
        check_members(&members)?;
        Ok(Self {
            wins: vec![0; members.len()],
            members,
            overall_best: 0,
        })
    }

    pub fn wins(&self) -> &[u64] {
        &self.wins
    }

    pub fn overall_best(&self) -> usize {
        self.overall_best
    }
}

impl<W: Word> Predictor<W> for MostRight<W> {
    fn predict(&self) -> W {
        self.members[self.overall_best].predict()
    }

    fn update(&mut self, value: W) {
        let last_best = best_member(&self.members, value);
        self.wins[last_best] += 1;
        // highest count, lowest index on ties
        self.overall_best = self
            .wins
            .iter()
            .enumerate()
            .fold(0, |best, (i, &w)| if w > self.wins[best] { i } else { best });
        self.members.iter_mut().for_each(|m| m.update(value));
    }

    fn reset(&mut self) {
        self.members.iter_mut().for_each(|m| m.reset());
        self.wins.iter_mut().for_each(|w| *w = 0);
        self.overall_best = 0;
    }

    fn name(&self) -> String {
        format!("Most Right [{}]", member_names(&self.members))
    }
}
