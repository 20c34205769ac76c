/// A value substituted into the letter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    DateOfService,
    ProcedureCodes,
    ClassificationCode,
    EmergencyCode,
    BillingProvider,
    Narrative,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::DateOfService,
        Slot::ProcedureCodes,
        Slot::ClassificationCode,
        Slot::EmergencyCode,
        Slot::BillingProvider,
        Slot::Narrative,
    ];

    /// Name used between braces in section bodies.
    pub fn name(self) -> &'static str {
        match self {
            Slot::DateOfService => "date_of_service",
            Slot::ProcedureCodes => "procedure_codes",
            Slot::ClassificationCode => "drg_code",
            Slot::EmergencyCode => "emergency_code",
            Slot::BillingProvider => "billing_provider",
            Slot::Narrative => "narrative",
        }
    }

    pub fn placeholder(self) -> String {
        format!("{{{}}}", self.name())
    }

    pub fn from_name(name: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// One fixed section of the justification letter.
#[derive(Debug, Clone, Copy)]
pub struct SectionDescriptor {
    pub id: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
    pub slots: &'static [Slot],
}

/// The letter, in order.
pub const LETTER_SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor {
        id: "introduction",
        heading: "Introduction",
        body: "{billing_provider} respectfully submits this justification in support of its offer in the \
Independent Dispute Resolution (IDR) process established under the No Surprises Act. The dispute \
concerns emergency services furnished on {date_of_service} and billed under procedure codes \
{procedure_codes}.\n\n\
The initial payment does not reflect the acuity of the patient, the resources the encounter \
required, or the credentials of the treating clinicians. Each of the factors below is one the \
certified IDR entity is directed to weigh under 45 C.F.R. 149.510(c)(4)(iii), and together they \
support payment at the provider's offer.",
        slots: &[Slot::BillingProvider, Slot::DateOfService, Slot::ProcedureCodes],
    },
    SectionDescriptor {
        id: "qpa_transparency",
        heading: "Qualifying Payment Amount Transparency",
        body: "The payer has not disclosed how its qualifying payment amount (QPA) for {emergency_code} \
was calculated. Without the underlying contracted rates and the methodology used to derive the \
median, the QPA cannot be treated as a reliable measure of the market value of these services.\n\n\
• **Methodology:** no explanation of the median contracted rate calculation was provided.\n\
• **Sample size:** the payer has not confirmed that enough contracts exist in the geographic region \
for this code.\n\
• **Adjustments:** nothing indicates that the QPA accounts for the complexity documented below.",
        slots: &[Slot::EmergencyCode],
    },
    SectionDescriptor {
        id: "classification_challenge",
        heading: "Challenge to Claim Classification",
        body: "The claim was adjudicated under DRG {drg_code}. That grouping understates the intensity \
of the encounter, which was billed at emergency evaluation and management level {emergency_code}. \
The documented presentation, diagnostic workup and interventions meet the criteria for that level, \
and any downcoding or bundling applied by the payer is not supported by the medical record.",
        slots: &[Slot::ClassificationCode, Slot::EmergencyCode],
    },
    SectionDescriptor {
        id: "patient_acuity",
        heading: "Patient Acuity & Complexity of Care",
        body: "The medical record documents the following.\n\n{narrative}",
        slots: &[Slot::Narrative],
    },
    SectionDescriptor {
        id: "provider_credentials",
        heading: "Provider Training, Experience and Quality",
        body: "{billing_provider} staffs its emergency department with board-certified emergency \
physicians around the clock. The training and experience brought to this encounter, together with \
the facility's quality outcomes, warrant reimbursement above the QPA.",
        slots: &[Slot::BillingProvider],
    },
    SectionDescriptor {
        id: "case_mix",
        heading: "Patient Case Mix",
        body: "Encounters billed at {emergency_code} sit at the high-acuity end of the department's \
case mix. These patients need immediate physician evaluation, advanced imaging and laboratory \
studies, and repeated reassessment, consuming far more resources than a median in-network rate \
reflects.",
        slots: &[Slot::EmergencyCode],
    },
    SectionDescriptor {
        id: "market_share",
        heading: "Relative Market Share",
        body: "The payer holds a dominant share of the commercial market in this region, which lets it \
set in-network rates largely on its own terms. QPAs derived from those rates reflect that \
bargaining imbalance rather than the fair value of emergency care.",
        slots: &[],
    },
    SectionDescriptor {
        id: "negotiation_history",
        heading: "Good Faith Negotiation History",
        body: "After the initial payment for services on {date_of_service}, the provider opened \
negotiation within the statutory timeframe. The payer made no counteroffer that reflected the \
factors described in this letter, and the parties could not reach agreement.",
        slots: &[Slot::DateOfService],
    },
    SectionDescriptor {
        id: "regulatory",
        heading: "Additional Circumstances",
        body: "The certified IDR entity must consider all credible information submitted by the \
parties and may not give the QPA presumptive weight. The provider asks the entity to consider:\n\n\
• the acuity and complexity documented for procedure codes {procedure_codes};\n\
• the training and experience of the treating clinicians;\n\
• the payer's market share and its conduct during open negotiation.",
        slots: &[Slot::ProcedureCodes],
    },
    SectionDescriptor {
        id: "conclusion",
        heading: "Conclusion",
        body: "For the reasons above, {billing_provider} requests that the IDR entity select its offer \
as the out-of-network rate for the services billed under {procedure_codes}, including emergency \
evaluation and management code {emergency_code}. Supporting documentation is available on request.",
        slots: &[Slot::BillingProvider, Slot::ProcedureCodes, Slot::EmergencyCode],
    },
];

/// Brace-delimited names in a section body, in order of appearance.
pub fn placeholders(body: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = body;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}
