use crate::web::router::Link;
use grievance_portal::AppRoute;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="max-w-6xl mx-auto py-6 space-y-8">
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h1 class="text-3xl font-bold">"Welcome to the Student Grievance Portal"</h1>
                    <p class="opacity-70">
                        "Submit grievances, track their status, and get transparent updates from the concerned departments."
                    </p>
                    <div class="flex gap-3 mt-2">
                        <Link to=AppRoute::Submit class="btn btn-primary">"Submit a Grievance"</Link>
                        <Link to=AppRoute::Dashboard { submitted: false } class="btn btn-outline">
                            "View your Grievances"
                        </Link>
                    </div>
                </div>
            </div>

            <section class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h2 class="card-title text-2xl">"How it works"</h2>
                    <ol class="list-decimal list-inside opacity-80 space-y-2 max-w-2xl">
                        <li><strong>"Register"</strong>" with your college email and create an account."</li>
                        <li><strong>"Submit"</strong>" your grievance with category, description, and optional attachments."</li>
                        <li><strong>"Track"</strong>" its status from your dashboard as departments respond."</li>
                        <li><strong>"Resolve"</strong>": get feedback and a resolution from the concerned department."</li>
                    </ol>
                </div>
            </section>
        </div>
    }
}
