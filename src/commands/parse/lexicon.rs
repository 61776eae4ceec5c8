use super::*;

const ACTION_KEYWORDS: &[(&str, Action)] = &[
    ("create", Action::Create),
    ("delete", Action::Delete),
    ("set", Action::Set),
    ("get", Action::Get),
    ("get all alarms", Action::GetAllAlarms),
    ("get all alarms next", Action::GetAllAlarmsNext),
    ("mib upload", Action::MibUpload),
    ("mib upload next", Action::MibUploadNext),
    ("mib reset", Action::MibReset),
    ("alarm", Action::AlarmNotification),
    ("attribute value change", Action::AttributeValueChange),
    ("test", Action::Test),
    ("start software download", Action::StartSoftwareDownload),
    ("download section", Action::DownloadSection),
    ("end software download", Action::EndSoftwareDownload),
    ("activate software", Action::ActivateSoftware),
    ("commit software", Action::CommitSoftware),
    ("synchronize time", Action::SynchronizeTime),
    ("reboot", Action::Reboot),
    ("get next", Action::GetNext),
    ("test result", Action::TestResult),
    ("get current data", Action::GetCurrentData),
    ("set table", Action::SetTable),
];

/// Lookup tables and compiled patterns shared by every extractor. Built once
/// per run and passed by reference.
#[derive(Debug)]
pub(crate) struct Lexicon {
    actions: HashMap<&'static str, Action>,
    /// Captures the text after each `(` up to the next `)`.
    pub(crate) paren_content: Regex,
    /// Matches a complete `( ... )` group.
    pub(crate) paren_group: Regex,
}

impl Lexicon {
    pub(crate) fn new() -> Result<Self> {
        let paren_content =
            Regex::new(r"\(([^)]*)").context("failed to compile parenthesis content regex")?;
        let paren_group =
            Regex::new(r"\([^)]*\)").context("failed to compile parenthesis group regex")?;

        Ok(Self {
            actions: ACTION_KEYWORDS.iter().copied().collect(),
            paren_content,
            paren_group,
        })
    }

    /// Case-insensitive keyword lookup.
    pub(crate) fn action(&self, keyword: &str) -> Option<Action> {
        let key = ascii_only(keyword).trim().to_lowercase();
        self.actions.get(key.as_str()).copied()
    }

    /// Inner text of every parenthesized group in `text`, in order.
    pub(crate) fn paren_items<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.paren_content
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|group| group.as_str())
            .collect()
    }
}
