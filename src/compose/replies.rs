//! Canned reply texts.

use crate::intent::Topic;

/// Sent before slow statistics lookups.
pub const FETCHING: &str = "Fetching results. Give me a few seconds...";

/// Answer to "how are you" small talk.
pub const WELLBEING: &str = "Doing good. How about yourself?";

/// Help text sent when nothing in the message was understood.
pub const DEFAULT_HELP: &str = "I'm sorry, I do not understand your message \u{1F641}\n\
You can ask me about number of confirmed or recovered cases or deaths due to COVID-19 \
in different countries. You can also ask me to plot the results in a graph.\n\
Additionally, you can also ask me about symptoms, prevention methods, vaccination \
or method of spread for COVID-19.\n\n\
Here are some examples:\n\
`@covidbot Can you tell me the number of confirmed cases in US and Spain?`\n\
`@covidbot Can you tell me the number of deaths in China and Italy?`\n\
`@covidbot Can you plot the number of confirmed cases in Mexico and India?`\n\
`@covidbot How does the virus spread?`\n\
`@covidbot What are the symptoms?`\n\
`@covidbot How does one prevent the virus?`\n\
`@covidbot Has any vaccine been found so far for this virus?`\n";

const SYMPTOMS: &str = "Symptoms:\n\
The most common symptoms of COVID-19 are fever, tiredness, and dry cough. \
Some patients may have aches and pains, nasal congestion, runny nose, sore throat or diarrhea.\n\n\
These symptoms are usually mild and begin gradually. Some people become infected but don't \
develop any symptoms and don't feel unwell.\n\
Most people (about 80%) recover from the disease without needing special treatment.\n\n\
Around 1 out of every 6 people who gets COVID-19 becomes seriously ill and develops \
difficulty breathing.\n\
Older people, and those with underlying medical problems like high blood pressure, heart \
problems or diabetes, are more likely to develop serious illness.\n\
People with fever, cough and difficulty breathing should seek medical attention.";

const SPREAD: &str = "Spreading mechanism:\n\
People can catch COVID-19 from others who have the virus. The disease can spread from person \
to person through small droplets from the nose or mouth which are spread when a person with \
COVID-19 coughs or exhales.\n\n\
These droplets land on objects and surfaces around the person. Other people then catch \
COVID-19 by touching these objects or surfaces, then touching their eyes, nose or mouth.\n\n\
People can also catch COVID-19 if they breathe in droplets from a person with COVID-19 who \
coughs out or exhales droplets. This is why it is important to stay more than 1 meter \
(3 feet) away from a person who is sick.";

const VACCINE: &str = "Treatment:\n\
Not yet. To date, there is no vaccine and no specific antiviral medicine to prevent or treat \
COVID-2019.\n\n\
However, those affected should receive care to relieve symptoms. People with serious illness \
should be hospitalized. Most patients recover thanks to supportive care.\n\
Possible vaccines and some specific drug treatments are under investigation.\n\
They are being tested through clinical trials. WHO is coordinating efforts to develop vaccines \
and medicines to prevent and treat COVID-19.\n\n\
The most effective ways to protect yourself and others against COVID-19 are to frequently \
clean your hands, cover your cough with the bend of elbow or tissue, and maintain a distance \
of at least 1 meter (3 feet) from people who are coughing or sneezing.";

const PREVENTION: &str = "DO THE FIVE and help stop coronavirus.\n\n\
HANDS - Wash them often \u{1F9FC}\u{1F450}\u{1F6B0}\n\
ELBOW - Cough into it \u{2705}\u{1F927}\u{1F4AA}\n\
FACE - Don't touch it \u{1F6AB}\u{1F926}\n\
SPACE - Keep safe distance \u{1F6AB}\u{1F9D1}\u{200D}\u{1F91D}\u{200D}\u{1F9D1}\n\
HOME - Stay if you can \u{1F3E0}\n";

const THANKS: &str = "You're welcome! \u{1F642}";

const INTRODUCTION: &str = "Hi! I am covidbot \u{1F642}\n\n\
I will give you latest information about number of confirmed or recovered cases or deaths \
due to COVID-19 in different countries. You can also ask me to plot the results in a graph.\n\n\
Additionally, you can also ask me about symptoms, prevention methods, vaccination \
or method of spread for COVID-19.\n";

const FAREWELL: &str = "Goodbye! Stay safe and stay home \u{1F642}";

/// Canned block for a topic.
pub fn topic_reply(topic: Topic) -> &'static str {
    match topic {
        Topic::Symptoms => SYMPTOMS,
        Topic::Spread => SPREAD,
        Topic::Vaccine => VACCINE,
        Topic::Prevention => PREVENTION,
        Topic::Thanks => THANKS,
        Topic::SelfIntro => INTRODUCTION,
        Topic::Farewell => FAREWELL,
    }
}

/// Greeting addressed to the sender.
pub fn greeting(sender: &str) -> String {
    format!("Hello {sender}!")
}
