use super::{FileContext, FileHandler};
use crate::program::{
    DEFINITION_ORDER, HOVER_ORDER, INST_SECTION, ProgramRef, cvariable_range, job_tag_at, label_range, token_at,
    validate_instruction,
};
use crate::types::{CompletionEntry, Finding, FoldRange, Location, Position};

/// `*.JBI` job programs.
pub(super) struct ProgramFile;

impl FileHandler for ProgramFile {
    fn validate(&self, cx: &FileContext<'_>) -> Option<Vec<Finding>> {
        let text = cx.text()?;
        let doc = cx.sections()?;
        let Some(inst) = doc.get(INST_SECTION) else {
            return Some(Vec::new());
        };
        let unknown_commands = cx.file.settings().unknown_commands;
        let mut findings = Vec::new();
        for line_no in inst.contents.start..inst.contents.end {
            let Some(line) = text.line(line_no) else {
                break;
            };
            findings.extend(validate_instruction(
                line,
                line_no,
                &cx.services.commands,
                unknown_commands,
                cx.messages(),
            ));
        }
        Some(findings)
    }

    fn hover(&self, cx: &FileContext<'_>, pos: Position) -> Option<String> {
        let doc = cx.sections()?;
        let (name, section) = doc.section_at_line(pos.line as usize)?;
        if name != INST_SECTION {
            return None;
        }
        let line = cx.line(pos.line)?;
        match token_at(line, pos, &HOVER_ORDER)?.reference {
            ProgramRef::Command(command) => {
                let offset = pos.line as usize - section.contents.start;
                let mut hover = cx.messages().tr("program.hover.lineNo", &[&offset]);
                let commands = &cx.services.commands;
                if let Some(detail) = commands.detail(&command) {
                    hover.push(' ');
                    hover.push_str(detail);
                    if let Some(description) = commands.description(&command, cx.messages().locale()) {
                        hover.push_str("\n\n");
                        hover.push_str(description);
                    }
                }
                Some(hover)
            }
            ProgramRef::Variable(address) => cx.controller.var_name(address),
            ProgramRef::Io(address) => cx.controller.io_name(address),
            _ => None,
        }
    }

    fn definition(&self, cx: &FileContext<'_>, pos: Position) -> Option<Location> {
        let line = cx.line(pos.line)?;
        let here = |range| Some(Location::new(cx.file.path().to_path_buf(), range));
        match token_at(line, pos, &DEFINITION_ORDER)?.reference {
            ProgramRef::Job(name) => cx.controller.job_location(&name),
            ProgramRef::Label(label) => here(label_range(cx.sections()?, cx.text()?, &label)?),
            ProgramRef::CVariable(number) => here(cvariable_range(cx.sections()?, cx.text()?, number)?),
            ProgramRef::Io(address) => cx.controller.io_name_location(address),
            ProgramRef::Variable(address) => cx.controller.var_name_location(address),
            ProgramRef::Command(_) => None,
        }
    }

    fn folding_ranges(&self, cx: &FileContext<'_>) -> Vec<FoldRange> {
        cx.section_folds()
    }

    fn completion(&self, cx: &FileContext<'_>, pos: Position) -> Option<Vec<CompletionEntry>> {
        let line = cx.line(pos.line)?;
        if !job_tag_at(line, pos.character) {
            return None;
        }
        let entries = cx
            .controller
            .job_names()
            .into_iter()
            .map(|label| CompletionEntry { label })
            .collect();
        Some(entries)
    }
}
