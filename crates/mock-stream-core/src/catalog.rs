// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canned markdown response templates, grouped by prompt category

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::classifier::Category;

/// A response template renders markdown for a subject
pub type ResponseTemplate = fn(&str) -> String;

/// Source of template indices.
///
/// Selection goes through this trait so callers decide between reproducible
/// (seeded or fixed) and fresh randomness.
pub trait IndexSource {
    /// Return an index in `0..len`. `len` is always non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Uniform indices from a seeded small RNG
#[derive(Debug, Clone)]
pub struct SeededIndex {
    rng: SmallRng,
}

impl SeededIndex {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy, for requests that did not ask for determinism
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Borrow the underlying RNG, e.g. to drive a filler text source
    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

impl IndexSource for SeededIndex {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always returns the same index (wrapped into range)
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn next_index(&mut self, len: usize) -> usize {
        self.0 % len
    }
}

/// Ordered template lists per category
#[derive(Debug, Clone)]
pub struct Catalog {
    person: Vec<ResponseTemplate>,
    company: Vec<ResponseTemplate>,
    generic: Vec<ResponseTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in catalog with three templates per category
    pub fn standard() -> Self {
        Self {
            person: vec![person_profile, person_timeline, person_quotes],
            company: vec![company_overview, company_metrics, company_swot],
            generic: vec![generic_explainer, generic_comparison, generic_faq],
        }
    }

    pub fn with_templates(
        person: Vec<ResponseTemplate>,
        company: Vec<ResponseTemplate>,
        generic: Vec<ResponseTemplate>,
    ) -> Self {
        Self {
            person,
            company,
            generic,
        }
    }

    pub fn templates(&self, category: Category) -> &[ResponseTemplate] {
        match category {
            Category::Person => &self.person,
            Category::Company => &self.company,
            Category::Generic => &self.generic,
        }
    }

    /// Render a response for `subject` from the `category` family
    pub fn pick(
        &self,
        category: Category,
        subject: &str,
        source: &mut dyn IndexSource,
    ) -> String {
        self.pick_with_index(category, subject, source).1
    }

    /// Like [`Catalog::pick`], also reporting the chosen template index.
    /// `None` means the fallback template was used.
    pub fn pick_with_index(
        &self,
        category: Category,
        subject: &str,
        source: &mut dyn IndexSource,
    ) -> (Option<usize>, String) {
        let templates = self.templates(category);
        if templates.is_empty() {
            return (None, fallback(subject));
        }
        let index = source.next_index(templates.len()).min(templates.len() - 1);
        (Some(index), templates[index](subject))
    }
}

/// Used only when a category has no templates
pub fn fallback(subject: &str) -> String {
    format!("Here is a short note about **{subject}**.\n")
}

fn person_profile(subject: &str) -> String {
    format!(
        "# {subject}\n\
         \n\
         **{subject}** is widely recognised for a body of work that shaped the conversation in their field.\n\
         \n\
         ## Early life\n\
         \n\
         - Grew up surrounded by books, tinkering and long debates\n\
         - Showed an early talent for connecting unrelated ideas\n\
         - Found mentors who encouraged rigorous, curious thinking\n\
         \n\
         ## Notable contributions\n\
         \n\
         1. Reframed a long-standing problem in simpler terms\n\
         2. Published writing that is still cited today\n\
         3. Inspired a generation of practitioners to follow\n\
         \n\
         > \"The best way to predict the future is to keep asking better questions.\"\n\
         \n\
         ## Legacy\n\
         \n\
         Today, {subject} is remembered as much for generosity with ideas as for the ideas themselves.\n"
    )
}

fn person_timeline(subject: &str) -> String {
    format!(
        "## A short timeline of {subject}\n\
         \n\
         | Period | Milestone |\n\
         |--------|-----------|\n\
         | Early years | First exposure to the craft |\n\
         | Formative decade | Key collaborations and first publications |\n\
         | Peak | Widely recognised work and public talks |\n\
         | Later years | Mentoring, writing and reflection |\n\
         \n\
         ### Why it matters\n\
         \n\
         Each phase of {subject}'s career built on the last. The through-line is a steady habit of \
         turning intuition into something others could reuse.\n\
         \n\
         - *Influence*: broad\n\
         - *Style*: patient and methodical\n\
         - *Reputation*: generous collaborator\n"
    )
}

fn person_quotes(subject: &str) -> String {
    format!(
        "### {subject} in their own words\n\
         \n\
         > \"Work on what you cannot stop thinking about.\"\n\
         \n\
         > \"Clarity is a kindness to your future self.\"\n\
         \n\
         People who worked with {subject} describe someone who:\n\
         \n\
         - listened before speaking\n\
         - wrote things down, always\n\
         - treated mistakes as data rather than verdicts\n\
         \n\
         **Further reading:** interviews, essays and the occasional long-form profile offer the best \
         picture of how {subject} approached problems.\n"
    )
}

fn company_overview(subject: &str) -> String {
    format!(
        "# {subject}: company overview\n\
         \n\
         **{subject}** builds products for teams that care about speed without giving up reliability.\n\
         \n\
         ## At a glance\n\
         \n\
         | Attribute | Detail |\n\
         |-----------|--------|\n\
         | Founded | A decade of steady growth |\n\
         | Headquarters | Distributed, with hubs on three continents |\n\
         | Focus | Developer tooling and automation |\n\
         | Culture | Remote-first, writing-heavy |\n\
         \n\
         ## Products\n\
         \n\
         - A core platform used by thousands of teams\n\
         - An ecosystem of integrations and plugins\n\
         - Professional services for large customers\n\
         \n\
         > {subject}'s stated mission is to make the boring parts of work disappear.\n"
    )
}

fn company_metrics(subject: &str) -> String {
    format!(
        "## {subject} by the numbers\n\
         \n\
         | Metric | Value | Trend |\n\
         |--------|-------|-------|\n\
         | Customers | 12,400 | ▲ |\n\
         | Employees | 850 | ▲ |\n\
         | Net retention | 118% | ▶ |\n\
         | Release cadence | Weekly | ▶ |\n\
         \n\
         ### Commentary\n\
         \n\
         Growth at {subject} has been driven mostly by expansion inside existing accounts. \
         Analysts point to three drivers:\n\
         \n\
         1. Product-led adoption by individual engineers\n\
         2. A pricing model that scales with usage\n\
         3. Strong word of mouth in technical communities\n"
    )
}

fn company_swot(subject: &str) -> String {
    format!(
        "### SWOT analysis: {subject}\n\
         \n\
         **Strengths**\n\
         - Loyal, vocal user base\n\
         - Fast shipping culture\n\
         \n\
         **Weaknesses**\n\
         - Thin presence in regulated industries\n\
         - Documentation lags behind features\n\
         \n\
         **Opportunities**\n\
         - Enterprise tier with compliance features\n\
         - Partnerships with cloud marketplaces\n\
         \n\
         **Threats**\n\
         - Larger incumbents bundling similar features\n\
         - Talent competition in key markets\n\
         \n\
         > Overall, {subject} is well positioned if it can pair its momentum with enterprise readiness.\n"
    )
}

fn generic_explainer(subject: &str) -> String {
    format!(
        "# {subject}\n\
         \n\
         Here is a concise explanation of **{subject}**.\n\
         \n\
         ## The short version\n\
         \n\
         {subject} is best understood as a set of ideas that fit together: a problem, a few \
         constraints and a handful of practical techniques.\n\
         \n\
         ## Key points\n\
         \n\
         - Start from the problem it solves\n\
         - Learn the vocabulary before the details\n\
         - Practice with small, concrete examples\n\
         \n\
         ```text\n\
         idea -> example -> practice -> intuition\n\
         ```\n\
         \n\
         > If you can explain {subject} to a friend in two sentences, you understand it.\n"
    )
}

fn generic_comparison(subject: &str) -> String {
    format!(
        "## {subject}: approaches compared\n\
         \n\
         | Approach | Strength | Trade-off |\n\
         |----------|----------|-----------|\n\
         | Minimal | Easy to start | Limited depth |\n\
         | Structured | Predictable results | More upfront effort |\n\
         | Exploratory | Surprising insights | Harder to repeat |\n\
         \n\
         ### Choosing\n\
         \n\
         1. Clarify what success looks like for {subject}\n\
         2. Pick the lightest approach that meets it\n\
         3. Revisit once you have real feedback\n\
         \n\
         *Tip:* most people overestimate how much structure they need at the beginning.\n"
    )
}

fn generic_faq(subject: &str) -> String {
    format!(
        "### Frequently asked questions about {subject}\n\
         \n\
         **What is it?**  \n\
         {subject} is a topic with more depth than it first appears.\n\
         \n\
         **Why does it matter?**  \n\
         Because small misunderstandings about {subject} compound over time.\n\
         \n\
         **Where should I start?**\n\
         \n\
         - Read one good overview\n\
         - Try one hands-on exercise\n\
         - Ask one expert a specific question\n\
         \n\
         > Curiosity scales better than memorisation.\n"
    )
}
