use tracing::warn;

use crate::error::{GedtreeError, Result};
use crate::options::{MarriagePlacement, TreeOptions};
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::renders::*;
use crate::renderer::traits::*;

/// Render the tree requested by `options` as genealogytree markup.
pub fn render_tree<G: RecordGraph + ?Sized>(graph: &G, options: &TreeOptions) -> Result<String> {
    TreeRenderer::new(graph, options).render()
}

/// Walks the family graph around a proband and emits nested blocks.
///
/// Each method that opens a block closes it before returning, so the
/// output stays balanced whatever the generation counts are.
pub struct TreeRenderer<'g, G: RecordGraph + ?Sized> {
    graph: &'g G,
    options: &'g TreeOptions,
    people: IndividualRenderer<'g, G>,
    output: String,
    /// Xrefs on the current recursion path.
    lineage: Vec<String>,
}

impl<'g, G: RecordGraph + ?Sized> TreeRenderer<'g, G> {
    pub fn new(graph: &'g G, options: &'g TreeOptions) -> Self {
        Self {
            graph,
            options,
            people: IndividualRenderer::new(graph),
            output: String::new(),
            lineage: Vec::new(),
        }
    }

    pub fn render(mut self) -> Result<String> {
        let options = self.options;
        let graph = self.graph;

        options.validate()?;
        let proband = graph
            .individual(&options.root)
            .ok_or_else(|| GedtreeError::UnknownIndividual(options.root.clone()))?;

        let context = RenderContext::new(options);
        context.trace(format_args!(
            "proband {}: {} ancestor / {} descendant generations",
            proband.xref, options.ancestors, options.descendants
        ));

        if options.ancestors > 0 && options.descendants > 0 {
            self.sandclock(&context, proband);
        } else if options.ancestors > 0 {
            let family = self.origin_options(proband);
            self.container(
                &context,
                Direction::Ancestors,
                proband,
                options.ancestors,
                family.as_deref(),
            );
        } else {
            let family = self.union_options(proband);
            self.container(
                &context,
                Direction::Descendants,
                proband,
                options.descendants,
                family.as_deref(),
            );
        }

        Ok(self.output)
    }

    /// Ancestors and descendants of the proband in one figure.
    fn sandclock(&mut self, context: &RenderContext, proband: &'g Individual) {
        let emitter = NodeEmitter;
        let inner = context.deeper();
        let innermost = inner.deeper();

        self.lineage.push(proband.xref.clone());

        let origin = self.origin_options(proband);
        self.output
            .push_str(&emitter.open_block(context.depth, NodeKind::Sandclock, origin.as_deref()));

        self.ancestors(&inner, proband, self.options.ancestors);

        let family = self.union_options(proband);
        self.output
            .push_str(&emitter.open_block(inner.depth, NodeKind::Child, family.as_deref()));
        self.output.push_str(&self.people.render(
            &innermost,
            PersonKind::Proband,
            proband,
            Role::Principal,
        ));
        self.descendants(&innermost, proband, self.options.descendants);
        self.output.push_str(&emitter.close_block(inner.depth));

        self.output.push_str(&emitter.close_block(context.depth));

        self.lineage.pop();
    }

    /// One recursion step: a leaf on the last generation, a container otherwise.
    fn traverse(
        &mut self,
        context: &RenderContext,
        direction: Direction,
        individual: &'g Individual,
        generations: u32,
        family: Option<&str>,
    ) {
        if self.options.is_ignored(&individual.xref) {
            context.trace(format_args!("{} ignored", individual.xref));
            return;
        }
        if self.lineage.contains(&individual.xref) {
            warn!(
                "{} is its own {}, not descending further",
                individual.xref,
                direction.node_kind()
            );
            return;
        }

        if generations <= 1 {
            let kind = direction.leaf();
            self.output
                .push_str(&self.people.render(context, kind, individual, Role::Principal));
        } else {
            self.container(context, direction, individual, generations, family);
        }
    }

    fn container(
        &mut self,
        context: &RenderContext,
        direction: Direction,
        individual: &'g Individual,
        generations: u32,
        family: Option<&str>,
    ) {
        let emitter = NodeEmitter;
        let inner = context.deeper();

        self.lineage.push(individual.xref.clone());

        self.output
            .push_str(&emitter.open_block(context.depth, direction.node_kind(), family));
        self.output.push_str(&self.people.render(
            &inner,
            PersonKind::Proband,
            individual,
            Role::Principal,
        ));
        self.walk(&inner, direction, individual, generations);
        self.output.push_str(&emitter.close_block(context.depth));

        self.lineage.pop();
    }

    fn walk(
        &mut self,
        context: &RenderContext,
        direction: Direction,
        individual: &'g Individual,
        generations: u32,
    ) {
        match direction {
            Direction::Ancestors => self.ancestors(context, individual, generations),
            Direction::Descendants => self.descendants(context, individual, generations),
        }
    }

    /// Father, then mother, each as a `parent` node.
    fn ancestors(&mut self, context: &RenderContext, individual: &'g Individual, generations: u32) {
        if generations <= 1 {
            return;
        }
        let Some(family) = self.family_of_origin(individual) else {
            context.trace(format_args!("{} has no family of origin", individual.xref));
            return;
        };
        if self.options.is_ignored(&family.xref) {
            context.trace(format_args!("{} ignored", family.xref));
            return;
        }

        for xref in [&family.husband, &family.wife].into_iter().flatten() {
            let Some(parent) = self.graph.individual(xref) else {
                context.trace(format_args!("parent {} not found", xref));
                continue;
            };
            let options = self.origin_options(parent);
            self.traverse(
                context,
                Direction::Ancestors,
                parent,
                generations - 1,
                options.as_deref(),
            );
        }
    }

    /// Every union in order; the first at the caller's depth, later ones
    /// wrapped in `union` blocks.
    fn descendants(
        &mut self,
        context: &RenderContext,
        individual: &'g Individual,
        generations: u32,
    ) {
        if generations <= 1 {
            return;
        }
        let emitter = NodeEmitter;
        let mut first = true;

        for xref in &individual.fams {
            if self.options.is_ignored(xref) {
                context.trace(format_args!("{} ignored", xref));
                continue;
            }
            let Some(family) = self.graph.family(xref) else {
                context.trace(format_args!("family {} not found", xref));
                continue;
            };

            let nested = !first;
            first = false;
            let union_context = if nested {
                let options = self.family_options(family);
                let head = emitter.open_block(context.depth, NodeKind::Union, options.as_deref());
                self.output.push_str(&head);
                context.deeper()
            } else {
                *context
            };

            if let Some(spouse) = self.spouse(individual, family) {
                self.output.push_str(&self.people.render(
                    &union_context,
                    PersonKind::Parent,
                    spouse,
                    Role::Spouse,
                ));
            }

            for child_xref in &family.children {
                let Some(child) = self.graph.individual(child_xref) else {
                    context.trace(format_args!("child {} not found", child_xref));
                    continue;
                };
                let options = self.union_options(child);
                self.traverse(
                    &union_context,
                    Direction::Descendants,
                    child,
                    generations - 1,
                    options.as_deref(),
                );
            }

            if nested {
                self.output.push_str(&emitter.close_block(context.depth));
            }
        }
    }

    /// The partner who is not driving the walk.
    fn spouse(&self, individual: &Individual, family: &Family) -> Option<&'g Individual> {
        let xref = match individual.sex {
            Sex::Male => family.wife.as_deref(),
            Sex::Female => family.husband.as_deref(),
            Sex::Unknown => [&family.husband, &family.wife]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .find(|xref| *xref != individual.xref),
        }?;
        if self.options.is_ignored(xref) {
            return None;
        }
        self.graph.individual(xref)
    }

    fn family_of_origin(&self, individual: &Individual) -> Option<&'g Family> {
        individual
            .famc
            .as_deref()
            .and_then(|xref| self.graph.family(xref))
    }

    /// Container options for the family the individual was born into.
    fn origin_options(&self, individual: &Individual) -> Option<String> {
        self.family_of_origin(individual)
            .and_then(|family| self.family_options(family))
    }

    /// Container options for the individual's first union.
    fn union_options(&self, individual: &Individual) -> Option<String> {
        individual
            .fams
            .iter()
            .find(|xref| !self.options.is_ignored(xref))
            .and_then(|xref| self.graph.family(xref))
            .and_then(|family| self.family_options(family))
    }

    fn family_options(&self, family: &Family) -> Option<String> {
        if self.options.is_ignored(&family.xref) {
            return None;
        }
        let mut options = format!("id={}", family.xref);
        if self.options.marriage == MarriagePlacement::Family {
            let marriage =
                EventFormatter.format_event("marriage", family.marriage.as_ref(), 0, None);
            if !marriage.is_empty() {
                options.push_str(&format!(",family database={{{}}}", marriage));
            }
        }
        Some(options)
    }
}
