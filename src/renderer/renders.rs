use crate::options::MarriagePlacement;
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::normalize::*;
use crate::renderer::traits::*;

/// Renders one individual's block: identity, life events, occupation,
/// marriage and floruit fields.
pub struct IndividualRenderer<'g, G: RecordGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: RecordGraph + ?Sized> IndividualRenderer<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    pub fn render(
        &self,
        context: &RenderContext,
        kind: PersonKind,
        individual: &Individual,
        role: Role,
    ) -> String {
        let emitter = NodeEmitter;
        let events = EventFormatter;
        let depth = context.depth;
        let inner = depth + 1;

        context.trace(format_args!("{} {}", kind, individual.xref));

        let id = format!("id={}", individual.xref);
        let mut output = emitter.open_block(depth, kind, Some(&id));

        if let Some(sex) = individual.sex.keyword() {
            output.push_str(&emitter.field(inner, sex));
        }

        if let Some(name) = individual.name.as_deref().filter(|n| !n.trim().is_empty()) {
            output.push_str(&emitter.field(inner, &format!("name={{{}}}", normalize_name(name))));
        }

        output.push_str(&events.format_event(
            "birth",
            individual.event(&EventTag::Birth),
            inner,
            self.birth_note(individual),
        ));

        // Baptism wins over christening when both are printable
        let mut baptism =
            events.format_event("baptism", individual.event(&EventTag::Baptism), inner, None);
        if baptism.is_empty() {
            baptism = events.format_event(
                "baptism",
                individual.event(&EventTag::Christening),
                inner,
                None,
            );
        }
        output.push_str(&baptism);

        for (key, tag) in [
            ("death", EventTag::Death),
            ("burial", EventTag::Burial),
            ("cremation", EventTag::Cremation),
        ] {
            output.push_str(&events.format_event(key, individual.event(&tag), inner, None));
        }

        if let Some(occupation) = individual
            .occupation
            .as_deref()
            .filter(|o| !o.trim().is_empty())
        {
            output.push_str(&emitter.field(
                inner,
                &format!("profession={{{}}}", escape_ampersand(occupation.trim())),
            ));
        }

        if shows_marriage(context.options.marriage, role) {
            let marriage = individual
                .fams
                .iter()
                .find(|xref| !context.options.is_ignored(xref))
                .and_then(|xref| self.graph.family(xref))
                .and_then(|family| family.marriage.as_ref());
            output.push_str(&events.format_event("marriage", marriage, inner, None));
        }

        if context.options.floruit {
            if let Some((from, to)) = floruit(individual) {
                let field = format!("floruit={{{:04}/{:04}}}", from, to);
                output.push_str(&emitter.field(inner, &field));
            }
        }

        output.push_str(&emitter.close_block(depth));
        output
    }

    /// Stillborn beats out of wedlock.
    fn birth_note(&self, individual: &Individual) -> Option<BirthNote> {
        let birth_date = individual
            .event(&EventTag::Birth)
            .and_then(EventRecord::event)
            .and_then(|e| e.date.as_deref());

        if let Some(death) = individual.event(&EventTag::Death).and_then(EventRecord::event) {
            let stillborn_age = death
                .age
                .as_deref()
                .is_some_and(|age| age.trim().eq_ignore_ascii_case("STILLBORN"));
            let same_day = matches!(
                (birth_date, death.date.as_deref()),
                (Some(birth), Some(death)) if birth.trim() == death.trim()
            );
            if stillborn_age || same_day {
                return Some(BirthNote::Stillborn);
            }
        }

        let family = individual
            .famc
            .as_deref()
            .and_then(|xref| self.graph.family(xref))?;
        if family.unmarried {
            return Some(BirthNote::OutOfWedlock);
        }

        let married = family.marriage_event().and_then(|e| e.date.as_deref())?;
        birth_date
            .is_some_and(|born| is_before(born, married))
            .then_some(BirthNote::OutOfWedlock)
    }
}

fn shows_marriage(placement: MarriagePlacement, role: Role) -> bool {
    matches!(
        (placement, role),
        (MarriagePlacement::Proband, Role::Principal) | (MarriagePlacement::Spouse, Role::Spouse)
    )
}

/// Span of years covered by an individual's dated life events.
///
/// Starts from the 9999/0000 pair; `None` when no event moved it.
pub fn floruit(individual: &Individual) -> Option<(u32, u32)> {
    let (first, last) = individual
        .events
        .iter()
        .filter(|record| record.tag != EventTag::Change)
        .filter_map(EventRecord::event)
        .filter_map(|event| event.date.as_deref())
        .filter_map(first_year)
        .fold((9999, 0), |(lo, hi), year| (lo.min(year), hi.max(year)));

    (first <= last).then_some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TreeOptions;
    use crate::tests::sample_genealogy;

    fn render(
        options: &TreeOptions,
        xref: &str,
        kind: PersonKind,
        role: Role,
        depth: usize,
    ) -> String {
        let genealogy = sample_genealogy();
        let individual = genealogy.individual(xref).unwrap().clone();
        let context = RenderContext::new(options).with_depth(depth);
        IndividualRenderer::new(&genealogy).render(&context, kind, &individual, role)
    }

    #[test]
    fn test_individual_without_events() {
        let options = TreeOptions::new("I9").with_floruit(true);
        let output = render(&options, "I9", PersonKind::Proband, Role::Principal, 0);
        assert_eq!(output, "g[id=I9]{\n}\n");
    }

    #[test]
    fn test_full_individual_block() {
        let options = TreeOptions::new("I1")
            .with_marriage(MarriagePlacement::Proband)
            .with_floruit(true);
        let output = render(&options, "I1", PersonKind::Proband, Role::Principal, 1);
        let expected = "\tg[id=I1]{\n\
                        \t\tmale,\n\
                        \t\tname={John \\surn{Smith}},\n\
                        \t\tbirth+={1900-03-15}{Springfield}{out of wedlock},\n\
                        \t\tdeath={1970}{Leeds},\n\
                        \t\tprofession={Baker \\& Son},\n\
                        \t\tmarriage={1925-06-12}{Leeds},\n\
                        \t\tfloruit={1900/1970},\n\
                        \t}\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_marriage_follows_placement_policy() {
        let proband = TreeOptions::new("I1").with_marriage(MarriagePlacement::Proband);
        assert!(!render(&proband, "I4", PersonKind::Parent, Role::Spouse, 1).contains("marriage"));

        let spouse = TreeOptions::new("I1").with_marriage(MarriagePlacement::Spouse);
        assert!(render(&spouse, "I4", PersonKind::Parent, Role::Spouse, 1)
            .contains("\t\tmarriage={1925-06-12}{Leeds},\n"));
        let principal = render(&spouse, "I1", PersonKind::Proband, Role::Principal, 1);
        assert!(!principal.contains("marriage"));

        let family = TreeOptions::new("I1");
        let principal = render(&family, "I1", PersonKind::Proband, Role::Principal, 1);
        assert!(!principal.contains("marriage"));
    }

    #[test]
    fn test_stillborn_overrides_out_of_wedlock() {
        let options = TreeOptions::new("I6");
        let output = render(&options, "I6", PersonKind::Child, Role::Principal, 0);
        assert!(output.contains("\tbirth+={1943}{}{stillborn},\n"));
    }

    #[test]
    fn test_death_on_birth_date_is_stillborn() {
        let mut genealogy = Genealogy::new();
        let mut baby = Individual::new("I1");
        baby.events = vec![
            EventRecord::new(EventTag::Birth, Event::dated("3 MAR 1901")),
            EventRecord::new(EventTag::Death, Event::dated("3 MAR 1901")),
        ];
        let mut infant = Individual::new("I2");
        infant.events = vec![
            EventRecord::new(EventTag::Birth, Event::dated("3 MAR 1901")),
            EventRecord::new(EventTag::Death, Event::dated("4 MAR 1901")),
        ];
        genealogy.insert_individual(baby.clone());
        genealogy.insert_individual(infant.clone());

        let options = TreeOptions::new("I1");
        let context = RenderContext::new(&options);
        let people = IndividualRenderer::new(&genealogy);

        let output = people.render(&context, PersonKind::Child, &baby, Role::Principal);
        assert!(output.contains("birth+={1901-03-03}{}{stillborn}"));

        let output = people.render(&context, PersonKind::Child, &infant, Role::Principal);
        assert!(output.contains("birth-={1901-03-03}"));
        assert!(!output.contains("stillborn"));
    }

    #[test]
    fn test_christening_stands_in_for_baptism() {
        let options = TreeOptions::new("I5");
        let output = render(&options, "I5", PersonKind::Child, Role::Principal, 0);
        assert!(output.contains("\tbaptism={1926}{St Mary},\n"));
        assert!(output.contains("\tbirth-={1926},\n"));
    }

    #[test]
    fn test_unmarried_parents_mark_birth() {
        let options = TreeOptions::new("I8");
        let output = render(&options, "I8", PersonKind::Child, Role::Principal, 0);
        assert!(output.contains("\tbirth+={1941}{}{out of wedlock},\n"));
    }

    #[test]
    fn test_floruit_ignores_change_stamp() {
        let genealogy = sample_genealogy();
        let john = genealogy.individual("I1").unwrap();
        assert_eq!(floruit(john), Some((1900, 1970)));

        let nobody = genealogy.individual("I9").unwrap();
        assert_eq!(floruit(nobody), None);
    }
}
