use clap::ValueEnum;

/// Which fixed instruction template a request is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    Abstraction,
    Summarization,
    Translation,
    Standard,
}

const ABSTRACTION_INSTRUCTION: &str = "### Instruction:
Je taak is om een klinische abstractie te maken van de onderstaande rapportage. Let op: je mag intern redeneren, maar in je output mag alleen de uiteindelijke abstractie verschijnen — géén tussenstappen, géén uitleg, géén interne gedachten.

Volg deze richtlijnen bij het maken van de abstractie:

1. Voeg geen nieuwe informatie toe en trek geen conclusies die niet letterlijk in de rapportage staan.
2. Behoud alle belangrijke elementen, zoals:
   - observaties
   - benoemde emoties
   - klachten (fysiek of mentaal)
   - reacties op omgeving of begeleiding
   - uitgesproken voorkeuren of behoeftes
3. Noem alle uitgevoerde acties en gemaakte afspraken expliciet.
4. Neem oorzaak-gevolgrelaties op zoals die in de tekst benoemd worden.
5. Zorg voor correct en verzorgd Nederlands in de abstractie.
6. Sluit je output af met exact de volgende woorden: <|END_ABSTRACTIE|>

### Input:";

const ABSTRACTION_SUFFIX: &str = "\n\n### Output:\n<|ABSTRACTIE_START|>\n";

const TRANSLATION_INSTRUCTION: &str =
    "### INSTRUCTIE\nVertaal deze Nederlandse medische tekst naar het Engels:\n\n";

const STANDARD_INSTRUCTION: &str =
    "### INSTRUCTIE\nBehandel deze tekst volgens een standaardprocedure:\n\n";

/// A fixed instruction template plus the delimiters the model output is
/// bounded with. Rendering is plain concatenation: instruction, then the
/// source text, then the output suffix.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub instruction: &'static str,
    pub suffix: &'static str,
    pub stop: &'static [&'static str],
}

impl PromptTemplate {
    pub fn for_task(task: TaskKind) -> Self {
        match task {
            // Summarization uses the same instruction family as abstraction.
            TaskKind::Abstraction | TaskKind::Summarization => Self {
                instruction: ABSTRACTION_INSTRUCTION,
                suffix: ABSTRACTION_SUFFIX,
                stop: &["<|END_ABSTRACTIE|>"],
            },
            TaskKind::Translation => Self {
                instruction: TRANSLATION_INSTRUCTION,
                suffix: "\n\n### Vertaling:\n",
                stop: &["<|END_TRANSLATION|>"],
            },
            TaskKind::Standard => Self {
                instruction: STANDARD_INSTRUCTION,
                suffix: "\n\n### Reactie:\n",
                stop: &[],
            },
        }
    }

    pub fn render(&self, text: &str) -> String {
        format!("{}{}{}", self.instruction, text, self.suffix)
    }

    pub fn stop_sequences(&self) -> Vec<String> {
        self.stop.iter().map(|s| s.to_string()).collect()
    }
}
