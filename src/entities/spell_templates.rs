use crate::entities::spells::{SpellTable, MAX_SPELLS};
use crate::error::SpellError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Pending,
    Visiting,
    Done,
}

/// Applies template inheritance to every spell, bases before dependents.
/// Running it again on a resolved table changes nothing.
pub fn resolve_templates(table: &mut SpellTable) -> Result<usize, SpellError> {
    let mut marks = vec![Mark::Pending; MAX_SPELLS];
    let mut chain = Vec::new();
    let mut resolved = 0usize;
    for number in 1..MAX_SPELLS {
        let has_template = table.slot(number).is_some_and(|spell| spell.template != 0);
        if has_template {
            apply_template(table, number, &mut marks, &mut chain)?;
            resolved += 1;
        }
    }
    Ok(resolved)
}

fn apply_template(
    table: &mut SpellTable,
    number: usize,
    marks: &mut [Mark],
    chain: &mut Vec<u16>,
) -> Result<(), SpellError> {
    match marks[number] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let start = chain.iter().position(|entry| usize::from(*entry) == number).unwrap_or(0);
            let mut cycle = chain[start..].to_vec();
            cycle.push(number as u16);
            return Err(SpellError::TemplateCycle {
                number: cycle[0],
                chain: cycle,
            });
        }
        Mark::Pending => {}
    }

    let template = match table.slot(number) {
        Some(spell) => spell.template,
        None => return Ok(()),
    };
    if template == 0 {
        marks[number] = Mark::Done;
        return Ok(());
    }
    let base_number = usize::from(template);
    if base_number >= MAX_SPELLS {
        return Err(SpellError::TemplateOutOfRange {
            number: number as u16,
            template,
        });
    }

    marks[number] = Mark::Visiting;
    chain.push(number as u16);
    apply_template(table, base_number, marks, chain)?;
    chain.pop();

    if let Some(base) = table.slot(base_number).cloned() {
        if let Some(spell) = table.slot_mut(number) {
            spell.inherit_from(&base);
        }
    }
    marks[number] = Mark::Done;
    Ok(())
}
