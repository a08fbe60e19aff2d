use std::fmt::{self, Write};

use crate::config::SiteConfig;
use crate::html::{escape_multiline, safe_href, Escaped};
use crate::models::{Achievement, EngineeringApproach, Profile, Project, Skill, DEFAULT_NAME};

/// Everything the public page shows, loaded once per request.
#[derive(Debug, Default)]
pub struct LandingData {
    pub profile: Option<Profile>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub achievements: Vec<Achievement>,
    pub approaches: Vec<EngineeringApproach>,
}

const PLACEHOLDER_HEADLINE: &str = "Building your personal brand";
const PLACEHOLDER_ABOUT: &str = "Populate your portfolio by adding profile details, featured \
                                 projects and skills through the admin dashboard.";

/// Skills bucketed by category, categories in order of first appearance.
pub fn group_skills(skills: &[Skill]) -> Vec<(&str, Vec<&Skill>)> {
    let mut groups: Vec<(&str, Vec<&Skill>)> = Vec::new();
    for skill in skills {
        match groups.iter_mut().find(|(c, _)| *c == skill.category) {
            Some((_, bucket)) => bucket.push(skill),
            None => groups.push((skill.category.as_str(), vec![skill])),
        }
    }
    groups
}

pub fn render_landing(site: &SiteConfig, data: &LandingData) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(16 * 1024);
    let name = data.profile.as_ref().map(|p| p.name.as_str()).unwrap_or(DEFAULT_NAME);
    let title = if site.title.trim().is_empty() {
        name.to_string()
    } else {
        format!("{} | {}", name, site.title)
    };

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{}</title>
<meta name="description" content="{}">
<style>{}</style>
</head>
<body>
"#,
        Escaped(&title),
        Escaped(&site.description),
        STYLE
    )?;

    write_nav(&mut out, name)?;
    out.push_str("<main>\n");
    write_hero(&mut out, data.profile.as_ref())?;
    write_projects(&mut out, &data.projects)?;
    write_skills(&mut out, &data.skills)?;
    write_achievements(&mut out, &data.achievements)?;
    write_approaches(&mut out, &data.approaches)?;
    write_contact(&mut out, data.profile.as_ref())?;
    out.push_str("</main>\n");

    write!(
        out,
        "<footer><p>&copy; {} {}</p></footer>\n<script>{}</script>\n</body>\n</html>\n",
        chrono::Utc::now().format("%Y"),
        Escaped(name),
        CONTACT_SCRIPT
    )?;
    Ok(out)
}

fn write_nav(out: &mut String, name: &str) -> fmt::Result {
    write!(
        out,
        r##"<header class="nav"><a class="brand" href="/">{}</a>
<nav><a href="#projects">Projects</a><a href="#skills">Skills</a><a href="#achievements">Achievements</a><a href="#approach">Approach</a><a href="#contact">Contact</a></nav></header>
"##,
        Escaped(name)
    )
}

fn write_hero(out: &mut String, profile: Option<&Profile>) -> fmt::Result {
    let Some(profile) = profile else {
        return write!(
            out,
            "<section class=\"hero\"><p class=\"eyebrow\">Portfolio Overview</p><h1>{}</h1><p class=\"lead\">{}</p></section>\n",
            PLACEHOLDER_HEADLINE, PLACEHOLDER_ABOUT
        );
    };

    out.push_str("<section class=\"hero\">");
    if let Some(image) = profile.hero_image.as_deref() {
        write!(out, "<img class=\"avatar\" src=\"{}\" alt=\"{}\">", safe_href(image), Escaped(&profile.name))?;
    }
    write!(
        out,
        "<p class=\"eyebrow\">{}</p><h1>{}</h1>",
        Escaped(&profile.role),
        Escaped(profile.headline.as_deref().unwrap_or(PLACEHOLDER_HEADLINE))
    )?;
    write!(
        out,
        "<p class=\"lead\">{}</p>",
        escape_multiline(profile.about.as_deref().unwrap_or(PLACEHOLDER_ABOUT))
    )?;

    out.push_str("<ul class=\"meta\">");
    if let Some(location) = profile.location.as_deref() {
        write!(out, "<li>{}</li>", Escaped(location))?;
    }
    if profile.available {
        out.push_str("<li class=\"badge\">Available for work</li>");
    }
    if let Some(resume) = profile.resume_url.as_deref() {
        write!(out, "<li><a href=\"{}\">Resume</a></li>", safe_href(resume))?;
    }
    for social in profile.socials.iter() {
        write!(
            out,
            "<li><a href=\"{}\" rel=\"noopener\">{}</a></li>",
            safe_href(&social.url),
            Escaped(&social.label)
        )?;
    }
    out.push_str("</ul></section>\n");
    Ok(())
}

fn write_projects(out: &mut String, projects: &[Project]) -> fmt::Result {
    out.push_str("<section id=\"projects\"><h2>Featured Projects</h2>");
    if projects.is_empty() {
        out.push_str("<p class=\"empty\">No featured projects yet.</p></section>\n");
        return Ok(());
    }
    out.push_str("<div class=\"grid\">");
    for project in projects {
        out.push_str("<article class=\"card\">");
        if let Some(image) = project.images.first() {
            write!(out, "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">", safe_href(image), Escaped(&project.title))?;
        }
        write!(
            out,
            "<h3>{}</h3><p>{}</p>",
            Escaped(&project.title),
            Escaped(&project.description)
        )?;
        if let Some(problem) = project.problem.as_deref() {
            write!(out, "<p class=\"muted\"><strong>Problem:</strong> {}</p>", Escaped(problem))?;
        }
        if !project.metrics.is_empty() {
            out.push_str("<dl class=\"metrics\">");
            for metric in project.metrics.iter() {
                write!(out, "<div><dt>{}</dt><dd>{}</dd></div>", Escaped(&metric.label), Escaped(&metric.value))?;
            }
            out.push_str("</dl>");
        }
        if !project.technologies.is_empty() {
            out.push_str("<ul class=\"tags\">");
            for tech in project.technologies.iter() {
                write!(out, "<li>{}</li>", Escaped(tech))?;
            }
            out.push_str("</ul>");
        }
        out.push_str("<p class=\"links\">");
        if let Some(link) = project.live_link.as_deref() {
            write!(out, "<a href=\"{}\" rel=\"noopener\">Live</a>", safe_href(link))?;
        }
        if let Some(link) = project.github_link.as_deref() {
            write!(out, "<a href=\"{}\" rel=\"noopener\">Source</a>", safe_href(link))?;
        }
        out.push_str("</p></article>");
    }
    out.push_str("</div></section>\n");
    Ok(())
}

fn write_skills(out: &mut String, skills: &[Skill]) -> fmt::Result {
    out.push_str("<section id=\"skills\"><h2>Skills</h2>");
    if skills.is_empty() {
        out.push_str("<p class=\"empty\">Skills will appear here soon.</p></section>\n");
        return Ok(());
    }
    out.push_str("<div class=\"grid\">");
    for (category, group) in group_skills(skills) {
        write!(out, "<div class=\"card\"><h3>{}</h3><ul class=\"skills\">", Escaped(category))?;
        for skill in group {
            write!(
                out,
                "<li><span>{}</span><span class=\"level\">{}</span></li>",
                Escaped(&skill.name),
                skill.proficiency.as_str()
            )?;
        }
        out.push_str("</ul></div>");
    }
    out.push_str("</div></section>\n");
    Ok(())
}

fn write_achievements(out: &mut String, achievements: &[Achievement]) -> fmt::Result {
    out.push_str("<section id=\"achievements\"><h2>Achievements</h2>");
    if achievements.is_empty() {
        out.push_str("<p class=\"empty\">Milestones will be listed here.</p></section>\n");
        return Ok(());
    }
    out.push_str("<ol class=\"timeline\">");
    for achievement in achievements {
        out.push_str("<li>");
        if let Some(date) = achievement.date {
            write!(out, "<time datetime=\"{}\">{}</time>", date.format("%Y-%m-%d"), date.format("%B %Y"))?;
        }
        match achievement.link.as_deref() {
            Some(link) => write!(
                out,
                "<h3><a href=\"{}\" rel=\"noopener\">{}</a></h3>",
                safe_href(link),
                Escaped(&achievement.title)
            )?,
            None => write!(out, "<h3>{}</h3>", Escaped(&achievement.title))?,
        }
        if let Some(issuer) = achievement.issued_by.as_deref() {
            write!(out, "<p class=\"muted\">{}</p>", Escaped(issuer))?;
        }
        if let Some(description) = achievement.description.as_deref() {
            write!(out, "<p>{}</p>", Escaped(description))?;
        }
        out.push_str("</li>");
    }
    out.push_str("</ol></section>\n");
    Ok(())
}

fn write_approaches(out: &mut String, approaches: &[EngineeringApproach]) -> fmt::Result {
    if approaches.is_empty() {
        return Ok(());
    }
    out.push_str("<section id=\"approach\"><h2>Engineering Approach</h2><div class=\"grid\">");
    for approach in approaches {
        write!(out, "<div class=\"card\"><h3>{}</h3><ul>", Escaped(&approach.title))?;
        for point in approach.points.iter() {
            write!(
                out,
                "<li><strong>{}</strong> {}</li>",
                Escaped(&point.heading),
                Escaped(&point.description)
            )?;
        }
        out.push_str("</ul></div>");
    }
    out.push_str("</div></section>\n");
    Ok(())
}

fn write_contact(out: &mut String, profile: Option<&Profile>) -> fmt::Result {
    out.push_str("<section id=\"contact\"><h2>Get in touch</h2>");
    if let Some(email) = profile.and_then(|p| p.email.as_deref()) {
        write!(out, "<p>Email me at <a href=\"mailto:{0}\">{0}</a> or use the form.</p>", Escaped(email))?;
    }
    out.push_str(
        r#"<form id="contact-form" class="card">
<label>Name<input name="name" required maxlength="200"></label>
<label>Email<input name="email" type="email" required maxlength="320"></label>
<label>Subject<input name="subject" maxlength="200" placeholder="General Inquiry"></label>
<label>Message<textarea name="message" rows="5" required></textarea></label>
<button type="submit">Send message</button>
<p id="contact-status" role="status"></p>
</form></section>
"#,
    );
    Ok(())
}

const STYLE: &str = "\
*{box-sizing:border-box}body{margin:0;font-family:system-ui,-apple-system,'Segoe UI',Roboto,sans-serif;background:#0f172a;color:#e2e8f0;line-height:1.6}\
a{color:#60a5fa}main{max-width:1100px;margin:0 auto;padding:2rem 1.5rem}\
.nav{display:flex;justify-content:space-between;align-items:center;padding:1rem 1.5rem;border-bottom:1px solid #1e293b}\
.nav nav a{margin-left:1rem;text-decoration:none;color:#cbd5e1}.brand{font-weight:700;text-decoration:none;color:#fff}\
.hero{padding:3rem 0}.hero h1{font-size:2.5rem;margin:.25rem 0;color:#fff}.eyebrow{text-transform:uppercase;letter-spacing:.3em;font-size:.8rem;color:#94a3b8}\
.lead{font-size:1.15rem;color:#cbd5e1;max-width:42rem}.avatar{width:96px;height:96px;border-radius:50%;object-fit:cover}\
.meta,.tags,.skills{list-style:none;padding:0;display:flex;flex-wrap:wrap;gap:.5rem}.meta li,.tags li{background:#1e293b;border-radius:999px;padding:.2rem .8rem;font-size:.85rem}\
.badge{background:#14532d!important;color:#bbf7d0}section{margin:3rem 0}h2{color:#fff}\
.grid{display:grid;gap:1.25rem;grid-template-columns:repeat(auto-fill,minmax(280px,1fr))}\
.card{background:#111c33;border:1px solid #1e293b;border-radius:16px;padding:1.25rem}.card img{width:100%;border-radius:10px}\
.skills{flex-direction:column}.skills li{display:flex;justify-content:space-between}.level,.muted{color:#94a3b8;font-size:.85rem}\
.metrics{display:flex;gap:1rem}.metrics dt{font-size:.75rem;color:#94a3b8}.metrics dd{margin:0;font-weight:700}\
.links a{margin-right:1rem}.timeline{padding-left:1.2rem}.timeline li{margin-bottom:1.25rem}.empty{color:#64748b}\
form label{display:block;margin-bottom:.75rem}input,textarea{width:100%;padding:.6rem;border-radius:8px;border:1px solid #334155;background:#0b1220;color:#e2e8f0}\
button{padding:.6rem 1.4rem;border:0;border-radius:999px;background:#3b82f6;color:#fff;font-weight:600;cursor:pointer}\
footer{text-align:center;padding:2rem;color:#64748b;border-top:1px solid #1e293b}";

const CONTACT_SCRIPT: &str = r#"
(function(){
  var form=document.getElementById('contact-form');
  if(!form)return;
  var status=document.getElementById('contact-status');
  form.addEventListener('submit',function(ev){
    ev.preventDefault();
    var data={};
    new FormData(form).forEach(function(v,k){data[k]=v;});
    status.textContent='Sending...';
    fetch('/api/contact',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify(data)})
      .then(function(res){return res.json().then(function(body){return {ok:res.ok,body:body};});})
      .then(function(r){
        if(r.ok){form.reset();status.textContent='Thanks! Your message has been received.';}
        else{status.textContent=(r.body&&r.body.message)||'Something went wrong.';}
      })
      .catch(function(){status.textContent='Network error, please try again.';});
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Proficiency, ProjectInput, SkillInput};
    use chrono::Utc;

    fn skill(name: &str, category: &str) -> Skill {
        let input = SkillInput {
            name: Some(name.into()),
            category: Some(category.into()),
            proficiency: Some(Proficiency::Expert),
            ..SkillInput::default()
        };
        Skill::create(input, Utc::now(), 0).expect("skill")
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let skills = vec![skill("Rust", "backend"), skill("CSS", "frontend"), skill("Go", "backend")];
        let groups = group_skills(&skills);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "backend");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "frontend");
    }

    #[test]
    fn placeholder_page_without_profile() {
        let html = render_landing(&SiteConfig::default(), &LandingData::default()).expect("render");
        assert!(html.contains(PLACEHOLDER_HEADLINE));
        assert!(html.contains("id=\"contact-form\""));
        assert!(html.contains("/api/contact"));
    }

    #[test]
    fn content_is_escaped() {
        let project = Project::create(
            ProjectInput {
                title: Some("<b>Bold</b>".into()),
                description: Some("x & y".into()),
                featured: Some(true),
                ..ProjectInput::default()
            },
            Utc::now(),
            0,
        )
        .expect("project");
        let data = LandingData {
            profile: Some(Profile::new_default(Utc::now())),
            projects: vec![project],
            skills: vec![skill("<script>", "tools")],
            ..LandingData::default()
        };
        let html = render_landing(&SiteConfig::default(), &data).expect("render");
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;"));
        assert!(html.contains("x &amp; y"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("expert"));
        assert!(!html.contains("<b>Bold</b>"));
    }
}
